pub mod footer;
pub mod header;
pub mod transcript;

pub use footer::Footer;
pub use header::Header;
pub use transcript::Transcript;
