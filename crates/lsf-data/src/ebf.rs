//! Raw event bytes as handed over by the decoder
//!
//! No attempt is made to verify the bytes are well-formed EBF.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ebf {
    data: Vec<u8>,
    gem_sequence: u32,
}

impl Ebf {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            gem_sequence: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replace the stored bytes, dropping any previous ones
    pub fn set(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
    }

    pub fn gem_sequence(&self) -> u32 {
        self.gem_sequence
    }

    pub fn set_gem_sequence(&mut self, sequence: u32) {
        self.gem_sequence = sequence;
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.gem_sequence = 0;
    }
}
