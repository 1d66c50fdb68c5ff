//! Department of Livestock Services source.
//!
//! Reserved: the DLS website is not currently accessible. Returns an empty
//! contribution until a working endpoint exists.

use krishi_commons::Notice;

pub async fn fetch_notices() -> Vec<Notice> {
    Vec::new()
}
