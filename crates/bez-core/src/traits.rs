use crate::error::Result;

/// Validate structural integrity of an editable entity.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
