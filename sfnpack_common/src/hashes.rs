use std::hash::{Hash, Hasher};

pub fn hashed<T: Hash + ?Sized>(data: &T, nonce: u32) -> [u8; 32] {
    struct HasherWrapper<'a>(&'a mut blake3::Hasher);
    impl<'a> Hasher for HasherWrapper<'a> {
        fn finish(&self) -> u64 {
            unreachable!()
        }
        fn write(&mut self, bytes: &[u8]) {
            self.0.update(bytes);
        }
    }

    let mut hasher = blake3::Hasher::new();
    (std::any::type_name::<T>(), data).hash(&mut HasherWrapper(&mut hasher));
    hasher.update(&nonce.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// The digest of every input that the minimized glyph container is derived from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct InputDigest([u8; 32]);
impl InputDigest {
    pub fn new(blocks: &[u8], corpus: &[u8], font: &[u8]) -> Self {
        InputDigest(hashed(&(blocks, corpus, font), 0))
    }

    pub fn to_hex(&self) -> String {
        let mut accum = String::with_capacity(64);
        for byte in self.0 {
            accum.push_str(&format!("{byte:02x}"));
        }
        accum
    }
}
