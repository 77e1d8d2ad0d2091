pub mod error;
pub mod fetch;
pub mod node;
pub mod output;
pub mod parser;
pub mod stats;
pub mod transform;

pub use error::DatexError;
pub use transform::Conversion;

/// Runs the whole pipeline over raw document bytes: lossy UTF-8 decoding,
/// XML loading, and the site transform.
///
/// # Errors
///
/// Fails on malformed XML or when the expected table element is missing.
pub fn convert(bytes: &[u8]) -> Result<Conversion, DatexError> {
    let xml = parser::decode_lossy(bytes);
    let document = parser::parse_document(&xml)?;
    transform::convert_document(document)
}
