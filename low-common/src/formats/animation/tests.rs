//! Tests for animation format

use glam::{Mat4, Quat, Vec3};

use super::*;

fn sample_matrix(seed: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, 1.0 + seed * 0.1, 1.0),
        Quat::from_rotation_y(seed * 0.25),
        Vec3::new(seed, -seed * 2.0, 0.5),
    )
}

fn clip_with(names: &[&str], frame_count: usize) -> AnimationClip {
    let tracks = names
        .iter()
        .enumerate()
        .map(|(i, name)| BoneTrack {
            name: name.to_string(),
            matrices: (0..frame_count)
                .map(|f| sample_matrix(i as f32 + f as f32))
                .collect(),
        })
        .collect();
    AnimationClip::new(frame_count, tracks)
}

fn encode(clip: &AnimationClip) -> Vec<u8> {
    let mut buffer = Vec::new();
    write_animation(&mut buffer, clip).unwrap();
    buffer
}

// ========================================================================
// Header Tests
// ========================================================================

#[test]
fn test_animation_header_roundtrip() {
    let header = AnimationHeader::new(25, 90);
    assert_eq!(header.tag, b'A');
    assert_eq!(header.bone_count, 25);
    assert_eq!(header.frame_count, 90);

    let bytes = header.to_bytes();
    assert_eq!(bytes.len(), AnimationHeader::SIZE);

    let parsed = AnimationHeader::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, header);
}

#[test]
fn test_animation_header_is_big_endian() {
    let bytes = AnimationHeader::new(2, 0x0102_0304).to_bytes();
    assert_eq!(bytes, [b'A', 2, 0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn test_animation_header_from_short_bytes() {
    assert!(AnimationHeader::from_bytes(&[b'A', 1, 0]).is_none());
}

#[test]
fn test_header_validation() {
    assert!(AnimationHeader::new(254, 10).validate());
    assert!(AnimationHeader::new(0, 0).validate());
    assert!(!AnimationHeader::new(255, 10).validate());

    let mut wrong_tag = AnimationHeader::new(1, 1);
    wrong_tag.tag = b'M';
    assert!(!wrong_tag.validate());
}

#[test]
fn test_animation_file_size() {
    // 2 bones named "root" and "child", 3 frames:
    // 6 + (4 + 1 + 3 x 64) + (5 + 1 + 3 x 64) = 401
    let header = AnimationHeader::new(2, 3);
    assert_eq!(header.file_size(9), 401);
    assert_eq!(header.track_size(4), 197);
}

// ========================================================================
// Matrix Encoding Tests
// ========================================================================

#[test]
fn test_matrix_is_column_major_big_endian() {
    // Distinct value per element so ordering mistakes show up
    let m = Mat4::from_cols_array(&[
        0.0, 1.0, 2.0, 3.0, // column 0
        4.0, 5.0, 6.0, 7.0, // column 1
        8.0, 9.0, 10.0, 11.0, // column 2
        12.0, 13.0, 14.0, 15.0, // column 3
    ]);
    let bytes = encode_matrix(&m);

    for (i, chunk) in bytes.chunks_exact(4).enumerate() {
        let value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let (col, row) = (i / 4, i % 4);
        assert_eq!(value, m.col(col)[row], "element {} (row {}, col {})", i, row, col);
    }

    // Translation lives in the last column and is written last
    let t = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let bytes = encode_matrix(&t);
    assert_eq!(&bytes[48..52], &1.0f32.to_be_bytes());
    assert_eq!(&bytes[52..56], &2.0f32.to_be_bytes());
    assert_eq!(&bytes[56..60], &3.0f32.to_be_bytes());
    assert_eq!(&bytes[60..64], &1.0f32.to_be_bytes());
}

#[test]
fn test_matrix_decode_is_bit_exact() {
    let m = sample_matrix(3.7);
    let decoded = decode_matrix(&encode_matrix(&m));
    assert_eq!(decoded.to_cols_array(), m.to_cols_array());
}

// ========================================================================
// Writer Tests
// ========================================================================

#[test]
fn test_write_layout() {
    let clip = clip_with(&["root", "child"], 3);
    let bytes = encode(&clip);

    assert_eq!(bytes.len(), 1 + 1 + 4 + (4 + 1 + 3 * 64) + (5 + 1 + 3 * 64));
    assert_eq!(bytes.len(), clip.encoded_size());
    assert_eq!(bytes[0], ANIMATION_TAG);
    assert_eq!(bytes[1], 2);
    assert_eq!(&bytes[2..6], &3u32.to_be_bytes());
    assert_eq!(&bytes[6..11], b"root#");

    let first_matrix: [u8; MATRIX_SIZE] = bytes[11..75].try_into().unwrap();
    assert_eq!(decode_matrix(&first_matrix), clip.tracks[0].matrices[0]);

    let child_name_start = 11 + 3 * 64;
    assert_eq!(&bytes[child_name_start..child_name_start + 6], b"child#");
}

#[test]
fn test_write_zero_bones() {
    let clip = AnimationClip::new(12, Vec::new());
    assert_eq!(encode(&clip), vec![b'A', 0, 0, 0, 0, 12]);
}

#[test]
fn test_write_rejects_bone_count_overflow() {
    let names: Vec<String> = (0..256).map(|i| format!("bone{}", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let clip = clip_with(&names, 0);

    let mut buffer = Vec::new();
    let err = write_animation(&mut buffer, &clip).unwrap_err();
    assert!(
        matches!(
            err,
            FormatError::FieldOverflow {
                field: "bone_count",
                value: 256,
                max: 255
            }
        ),
        "unexpected error: {err}"
    );
    assert!(buffer.is_empty(), "nothing should be written on failure");
}

#[test]
fn test_write_rejects_reserved_bone_count() {
    let names: Vec<String> = (0..255).map(|i| format!("bone{}", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let clip = clip_with(&names, 0);

    let mut buffer = Vec::new();
    let err = write_animation(&mut buffer, &clip).unwrap_err();
    assert!(matches!(err, FormatError::ReservedBoneCount));
    assert!(buffer.is_empty());
}

#[test]
fn test_write_rejects_delimiter_in_name() {
    let clip = clip_with(&["spine#1"], 1);
    let mut buffer = Vec::new();
    let err = write_animation(&mut buffer, &clip).unwrap_err();
    assert!(matches!(err, FormatError::InvalidBoneName { .. }));
    assert!(buffer.is_empty());
}

#[test]
fn test_write_rejects_non_ascii_name() {
    assert!(validate_bone_name("Knochen_ü").is_err());
    assert!(validate_bone_name("mixamorig:Hips").is_ok());
    assert!(validate_bone_name("").is_ok());
}

#[test]
fn test_write_rejects_short_track() {
    let mut clip = clip_with(&["root", "child"], 4);
    clip.tracks[1].matrices.pop();

    let mut buffer = Vec::new();
    let err = write_animation(&mut buffer, &clip).unwrap_err();
    match err {
        FormatError::TrackLength {
            bone,
            expected,
            actual,
        } => {
            assert_eq!(bone, "child");
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ========================================================================
// Reader Tests
// ========================================================================

#[test]
fn test_read_reproduces_clip() {
    let clip = clip_with(&["Hips", "Spine", "Head"], 5);
    let decoded = read_animation(&encode(&clip)).unwrap();

    assert_eq!(decoded.frame_count, 5);
    let names: Vec<_> = decoded.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Hips", "Spine", "Head"]);
    assert_eq!(decoded, clip);
    assert_eq!(decoded.track("Spine").unwrap().matrices.len(), 5);
}

#[test]
fn test_read_rejects_wrong_tag() {
    let mut bytes = encode(&clip_with(&["root"], 1));
    bytes[0] = b'M';
    assert!(matches!(
        read_animation(&bytes),
        Err(FormatError::InvalidTag(b'M'))
    ));
}

#[test]
fn test_read_rejects_reserved_bone_count() {
    let bytes = [b'A', 255, 0, 0, 0, 0];
    assert!(matches!(
        read_animation(&bytes),
        Err(FormatError::ReservedBoneCount)
    ));
}

#[test]
fn test_read_rejects_truncated_header() {
    assert!(matches!(
        read_animation(&[b'A', 1]),
        Err(FormatError::UnexpectedEof { offset: 0, .. })
    ));
}

#[test]
fn test_read_rejects_truncated_track() {
    let bytes = encode(&clip_with(&["root"], 2));
    let truncated = &bytes[..bytes.len() - 10];
    assert!(matches!(
        read_animation(truncated),
        Err(FormatError::UnexpectedEof { needed: 10, .. })
    ));
}

#[test]
fn test_read_rejects_missing_delimiter() {
    let bytes = [b'A', 1, 0, 0, 0, 0, b'r', b'o', b'o', b't'];
    assert!(matches!(
        read_animation(&bytes),
        Err(FormatError::MissingDelimiter { offset: 6 })
    ));
}

#[test]
fn test_read_rejects_trailing_bytes() {
    let mut bytes = encode(&clip_with(&["root"], 1));
    bytes.extend_from_slice(&[0, 0]);
    assert!(matches!(
        read_animation(&bytes),
        Err(FormatError::TrailingBytes(2))
    ));
}
