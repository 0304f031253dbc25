pub mod format;
pub mod gates;
pub mod sniffer;
pub mod uploader;
pub mod validator;

pub use format::{format_file_size, get_file_extension};
pub use gates::{extension_gate, size_gate};
pub use sniffer::{ContentSniffer, PDF_SIGNATURES, SNIFF_LENGTH};
pub use uploader::{CompletedValidation, PdfUploader, UploaderState, ValidationTicket};
pub use validator::{validate, PdfValidator};
