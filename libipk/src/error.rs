extern crate miette;
extern crate thiserror;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConverterError {
    #[error("error converting an value")]
    #[diagnostic(code(libipk::try_from_int_error))]
    TryFromIntError(#[from] std::num::TryFromIntError),
}

#[derive(Error, Diagnostic, Debug)]
pub enum CipherError {
    #[error("buffer length is not a multiple of the key word size (received {received:?} bytes)")]
    #[diagnostic(code(libipk::alignment_error))]
    UnalignedBuffer { received: usize },
}

#[derive(Error, Diagnostic, Debug)]
pub enum ReaderError {
    #[error("could not allocate a payload buffer of {size:?} bytes")]
    #[diagnostic(code(libipk::allocation_error))]
    AllocateBuffer {
        size: usize,
        #[source]
        error: std::collections::TryReserveError,
    },

    #[error(transparent)]
    #[diagnostic(code(libipk::convert_error))]
    ConvertValue(#[from] ConverterError),

    #[error(transparent)]
    #[diagnostic(code(libipk::cipher_error))]
    DecodeRecord(#[from] CipherError),

    #[error("incorrect record header at {offset:#X} (name offset {name_offset:?} exceeds payload size {payload_size:?})")]
    #[diagnostic(code(libipk::header_error))]
    IncorrectHeader {
        offset: u64,
        payload_size: u32,
        name_offset: u32,
    },

    #[error("module file reading error")]
    #[diagnostic(code(libipk::io_error))]
    ReadFile(#[from] std::io::Error),

    #[error("unable to read a record header at {offset:#X}")]
    #[diagnostic(code(libipk::truncated_error))]
    TruncatedHeader { offset: u64 },

    #[error("unable to read {expected:?} payload bytes at {offset:#X}")]
    #[diagnostic(code(libipk::truncated_error))]
    TruncatedPayload { offset: u64, expected: u32 },

    #[error("unable to write the output entry \"{name}\"")]
    #[diagnostic(code(libipk::io_error))]
    WriteEntry {
        name: String,
        #[source]
        error: std::io::Error,
    },
}
