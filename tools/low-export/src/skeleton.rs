//! Bone enumeration
//!
//! Fixes the order in which bones are sampled and written. The order is the
//! adapter's native bone order, so identical input always yields identical
//! output.

use low_common::MAX_BONES;

use crate::error::ExportError;
use crate::scene::{Armature, Bone};

/// Enumerate an armature's bones in native order
pub fn enumerate_bones(armature: &Armature) -> Result<Vec<&Bone>, ExportError> {
    let count = armature.len();
    if count > MAX_BONES {
        return Err(ExportError::TooManyBones { count });
    }
    Ok(armature.bones().iter().collect())
}
