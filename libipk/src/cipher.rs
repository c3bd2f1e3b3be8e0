use byteorder::ByteOrder;

use crate::error::CipherError;
use crate::keystream::Keystream;

/// Apply the keystream to a buffer in place, one 32-bit word at a time.
///
/// The exclusive-or is symmetric: the same call encodes plaintext and
/// decodes ciphertext, as long as the keystream starts from the same state.
/// A record's header and payload share one keystream, so the caller keeps
/// the generator running between the two calls and resets it only at
/// record boundaries.
pub fn apply(buffer: &mut [u8], key: &mut Keystream) -> Result<(), CipherError> {
    if buffer.len() % 4 != 0 {
        return Err(CipherError::UnalignedBuffer {
            received: buffer.len(),
        });
    }

    for chunk in buffer.chunks_exact_mut(4) {
        let word = byteorder::LittleEndian::read_u32(chunk) ^ key.next_word();
        byteorder::LittleEndian::write_u32(chunk, word);
    }

    Ok(())
}
