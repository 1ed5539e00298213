use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcmError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    TemplateError(#[from] indicatif::style::TemplateError),

    #[error("The input does not contain enough data for the requested sectors")]
    InputUnderflow,

    #[error("The output buffer is too small for the encoded stream")]
    OutputBufferFull,

    #[error("The sector index cannot hold an entry for every sector")]
    IndexCapacity,

    #[error("The sector index is empty")]
    IndexEmpty,

    #[error("The input file is not a valid ECM2 file or its header is implausible")]
    HeaderInvalid,
}

pub type EcmResult<T> = Result<T, EcmError>;
