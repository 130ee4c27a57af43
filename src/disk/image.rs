//! Blank disk image creation
//!
//! New disks are copies of a pre-formatted template with the volume label
//! patched into the system sector.

use std::path::Path;

use crate::error::{Error, Result};

/// Offset and width of the disk name field
pub const NAME_OFFSET: usize = 0;
pub const NAME_LEN: usize = 8;

/// Offset and width of the disk owner field
pub const OWNER_OFFSET: usize = 18;
pub const OWNER_LEN: usize = 20;

/// Volume label written into a new disk image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskLabel {
    pub name: String,
    pub owner: String,
}

impl DiskLabel {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
        }
    }

    /// Write the label into raw image bytes; longer values are cut to the field width
    ///
    /// Bytes past the end of the field are left as the template has them.
    pub fn apply(&self, image: &mut [u8]) {
        patch_field(image, NAME_OFFSET, NAME_LEN, &self.name);
        patch_field(image, OWNER_OFFSET, OWNER_LEN, &self.owner);
    }
}

fn patch_field(image: &mut [u8], offset: usize, width: usize, value: &str) {
    let bytes: Vec<u8> = value
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .take(width)
        .collect();
    let end = (offset + bytes.len()).min(image.len());
    if offset < end {
        image[offset..end].copy_from_slice(&bytes[..end - offset]);
    }
}

/// Copy `template` to `dest` and label the copy
///
/// Refuses to replace an existing `dest` unless `overwrite` is set.
pub async fn create_image(
    template: &Path,
    dest: &Path,
    label: &DiskLabel,
    overwrite: bool,
) -> Result<()> {
    if !tokio::fs::try_exists(template).await? {
        return Err(Error::TemplateNotFound {
            path: template.to_path_buf(),
        });
    }
    if !overwrite && tokio::fs::try_exists(dest).await? {
        return Err(Error::FileExists {
            path: dest.to_path_buf(),
        });
    }

    let mut data = tokio::fs::read(template).await?;
    label.apply(&mut data);
    tokio::fs::write(dest, &data).await?;

    info!(
        "Created disk image {} ('{}', owner '{}')",
        dest.display(),
        label.name,
        label.owner
    );
    Ok(())
}
