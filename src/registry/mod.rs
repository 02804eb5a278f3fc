//! Registry key handles

pub use self::key::Key;

mod key;
