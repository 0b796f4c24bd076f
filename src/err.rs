#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("register block allocation failed")]
    NoMemory,
    #[error("operation not supported by this display engine revision")]
    Unsupported,
    #[error("frame {width}x{height} exceeds the {max_width}x{max_height} limit")]
    SizeLimit {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("malformed picture-quality debug request")]
    PqdContract,
}
