use super::errors::ChannelError;

/// Read cursor over a single side-channel message body.
///
/// All scalars are little-endian. Strings are an `i32` byte length followed by
/// UTF-8 bytes.
#[derive(Debug)]
pub struct IncomingMessage<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> IncomingMessage<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, needed: usize) -> Result<&'a [u8], ChannelError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ChannelError::UnexpectedEof { needed, remaining });
        }
        let bytes = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ChannelError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_i32(&mut self) -> Result<i32, ChannelError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, ChannelError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_string(&mut self) -> Result<String, ChannelError> {
        let len = self.read_i32()?;
        let len = usize::try_from(len).map_err(|_| ChannelError::NegativeLength(len))?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ChannelError::InvalidUtf8)
    }
}

/// Builder for an outgoing side-channel message body.
#[derive(Debug, Default, Clone)]
pub struct OutgoingMessage {
    buf: Vec<u8>,
}

impl OutgoingMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_string(&mut self, value: &str) -> Result<&mut Self, ChannelError> {
        self.write_i32(length_prefix(value.len())?);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(self)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// `i32` length prefix for a string or frame body of `len` bytes.
pub(crate) fn length_prefix(len: usize) -> Result<i32, ChannelError> {
    i32::try_from(len).map_err(|_| ChannelError::MessageTooLarge(len))
}
