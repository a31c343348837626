//! Local path ⇄ `file://` URI conversion.
//!
//! The catalog records storage locations as `file://` URIs that must mean the
//! same thing regardless of which machine wrote them, so every conversion takes
//! an explicit [`PlatformMode`] instead of looking at the running OS.
//!
//! | Mode | Path | URI |
//! |------|------|-----|
//! | POSIX | `/a/b/c` | `file:///a/b/c` |
//! | Windows (drive) | `C:\a\b` | `file:///C:/a/b` |
//! | Windows (UNC) | `\\server\share\a` | `file://server/share/a` |
//!
//! For canonical inputs the conversions are inverse:
//!
//! ```
//! use lake_uri::{PlatformMode, to_path, to_uri};
//!
//! let uri = to_uri(r"C:\Study Data\export.csv", PlatformMode::Windows).unwrap();
//! assert_eq!(uri, "file:///C:/Study%20Data/export.csv");
//! assert_eq!(
//!     to_path(&uri, PlatformMode::Windows).unwrap(),
//!     r"C:\Study Data\export.csv"
//! );
//! ```

mod convert;
mod error;
mod mode;
mod uri;

// === Error Types ===
pub use error::{Result, UriError};

// === Platform Mode ===
pub use mode::PlatformMode;

// === URI Model ===
pub use uri::FileUri;

// === Conversion ===
pub use convert::{local_path_to_uri, to_path, to_uri};
