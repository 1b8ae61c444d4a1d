//! GLB container assembly.

use serde_json::Value;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Wrap a glTF JSON document and its binary buffer into a GLB file.
///
/// An empty buffer produces a JSON-only GLB with no `buffers` entry.
pub(crate) fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let mut root = root.clone();
    if buffer_data.is_empty() {
        if let Some(object) = root.as_object_mut() {
            object.remove("buffers");
        }
    } else {
        root["buffers"] = serde_json::json!([{ "byteLength": buffer_data.len() }]);
    }

    let json_bytes = serde_json::to_vec(&root).expect("Failed to serialize JSON");

    // Chunks are 4-byte aligned
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let mut total_length = 12 + 8 + json_chunk_length;
    if !buffer_data.is_empty() {
        total_length += 8 + buffer_chunk_length;
    }

    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    if !buffer_data.is_empty() {
        glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(buffer_data);
        glb.extend(std::iter::repeat_n(0u8, buffer_padding));
    }

    glb
}
