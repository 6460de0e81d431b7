pub mod marker;
pub mod canonical;
pub mod verify;
pub mod sign;

pub use marker::{Extracted, MarkerKey, MarkerPattern, extract, render_line};
pub use canonical::{Canonical, canonicalize, embed, integrity_digest};
pub use verify::{VerifyResult, verify};
pub use sign::{SignResult, sign, sign_with};
