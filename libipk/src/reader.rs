use std::io::{Read, Seek};

use byteorder::ByteOrder;

use crate::error::ReaderError;
use crate::keystream::Keystream;
use crate::{cipher, converter, HEADER_SIZE};

/// Metadata of one packed record
#[derive(Debug)]
pub struct Entry {
    /// Output name embedded in the record
    pub name: String,
    /// Position of the record header in the module file
    pub offset: u64,
    /// Size of the record payload (in bytes)
    pub payload_size: u32,
    /// Size of the output content (in bytes)
    pub size: u32,
}

/// Decoded record header fields
#[derive(Debug)]
pub struct RecordHeader {
    /// Offset of the embedded name within the payload
    pub name_offset: u32,
    /// Bytes of payload following the header
    pub payload_size: u32,
}

/// Sink receiving each decoded entry in module order
pub trait EntrySink {
    /// Write the full content of one entry under the given name
    fn write_entry(&mut self, name: &str, content: &[u8]) -> std::io::Result<()>;
}

impl EntrySink for Vec<(String, Vec<u8>)> {
    fn write_entry(&mut self, name: &str, content: &[u8]) -> std::io::Result<()> {
        self.push((String::from(name), content.to_vec()));
        Ok(())
    }
}

struct DiscardSink;

impl EntrySink for DiscardSink {
    fn write_entry(&mut self, _name: &str, _content: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

/// Decode every record and pass it to the sink, in module order.
///
/// Each record is fully decoded and written before the next header is
/// read; the first failure aborts the whole run. Trailing bytes of one
/// header length or less after the last record are ignored.
pub fn extract(file: &std::fs::File, sink: &mut dyn EntrySink) -> Result<Vec<Entry>, ReaderError> {
    let size = get_file_size(file)?;
    let mut reader = std::io::BufReader::new(file);
    let mut buffer = PayloadBuffer::default();
    let mut key = Keystream::new();
    let mut list: Vec<Entry> = Vec::new();
    let mut offset: u64 = 0;

    if let Err(error) = reader.seek(std::io::SeekFrom::Start(0)) {
        return Err(ReaderError::ReadFile(error));
    };

    while offset + u64::from(HEADER_SIZE) < size {
        key.reset();

        let mut raw = [0u8; HEADER_SIZE as usize];

        if let Err(error) = reader.read_exact(&mut raw) {
            return Err(match error.kind() {
                std::io::ErrorKind::UnexpectedEof => ReaderError::TruncatedHeader { offset },
                _ => ReaderError::ReadFile(error),
            });
        };

        cipher::apply(&mut raw, &mut key)?;

        let header = parse_header(&raw, offset)?;
        let payload = buffer.reserve(converter::u32_to_usize(header.payload_size)?)?;

        if let Err(error) = reader.read_exact(payload) {
            return Err(match error.kind() {
                std::io::ErrorKind::UnexpectedEof => ReaderError::TruncatedPayload {
                    offset: offset + u64::from(HEADER_SIZE),
                    expected: header.payload_size,
                },
                _ => ReaderError::ReadFile(error),
            });
        };

        cipher::apply(payload, &mut key)?;

        let split = converter::u32_to_usize(header.name_offset)?;
        let name = decode_name(&payload[split..]);

        log::debug!(
            "record at {:#X}: {} payload bytes, {} content bytes, name {:?}",
            offset,
            header.payload_size,
            header.name_offset,
            name
        );

        if let Err(error) = sink.write_entry(&name, &payload[..split]) {
            return Err(ReaderError::WriteEntry { name, error });
        };

        list.push(Entry {
            name,
            offset,
            payload_size: header.payload_size,
            size: header.name_offset,
        });

        offset += u64::from(HEADER_SIZE) + converter::u32_to_u64(header.payload_size)?;
    }

    Ok(list)
}

/// Get a list of packed records without writing them anywhere
pub fn get_list(file: &std::fs::File) -> Result<Vec<Entry>, ReaderError> {
    let mut sink = DiscardSink;
    extract(file, &mut sink)
}

/// Extract the length fields of a decoded record header
pub fn parse_header(
    buffer: &[u8; HEADER_SIZE as usize],
    offset: u64,
) -> Result<RecordHeader, ReaderError> {
    let payload_size = byteorder::LittleEndian::read_u32(&buffer[0..4]);
    let name_offset = byteorder::LittleEndian::read_u32(&buffer[4..8]);

    if name_offset > payload_size {
        return Err(ReaderError::IncorrectHeader {
            offset,
            payload_size,
            name_offset,
        });
    }

    Ok(RecordHeader {
        name_offset,
        payload_size,
    })
}

/// Payload buffer reused across records; grows on demand, never shrinks
#[derive(Debug, Default)]
struct PayloadBuffer {
    bytes: Vec<u8>,
}

impl PayloadBuffer {
    /// Borrow the first `size` bytes, growing the backing storage if needed
    fn reserve(&mut self, size: usize) -> Result<&mut [u8], ReaderError> {
        if size > self.bytes.len() {
            if let Err(error) = self.bytes.try_reserve(size - self.bytes.len()) {
                return Err(ReaderError::AllocateBuffer { size, error });
            };

            self.bytes.resize(size, 0);
        }

        Ok(&mut self.bytes[..size])
    }
}

fn decode_name(buffer: &[u8]) -> String {
    let end = buffer
        .iter()
        .position(|&value| value == 0)
        .unwrap_or(buffer.len());

    String::from_utf8_lossy(&buffer[..end]).to_string()
}

fn get_file_size(file: &std::fs::File) -> Result<u64, ReaderError> {
    let metadata = match file.metadata() {
        Err(error) => return Err(ReaderError::ReadFile(error)),
        Ok(value) => value,
    };

    Ok(metadata.len())
}
