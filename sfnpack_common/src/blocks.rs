use log::{debug, warn};

/// A single Unicode block, along with the number of times the corpus referenced it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Block {
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub usage: usize,
}
impl Block {
    pub fn new(start: u32, end: u32, name: impl Into<String>) -> Self {
        Block { start, end, name: name.into(), usage: 0 }
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        codepoint >= self.start && codepoint <= self.end
    }

    pub fn is_used(&self) -> bool {
        self.usage != 0
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlockTable {
    blocks: Vec<Block>,
}
impl BlockTable {
    pub fn new(blocks: Vec<Block>) -> Self {
        BlockTable { blocks }
    }

    /// Parses a block table in the format of the UCD `Blocks.txt` file.
    ///
    /// Only lines of the exact shape `XXXX..XXXX; Name` are accepted, which means blocks outside
    /// the BMP are skipped along with comments and blank lines.
    pub fn parse(data: &str) -> Self {
        let mut blocks = Vec::new();
        for line in data.split('\n') {
            // `XXXX..XXXX;` is 11 bytes long, anything shorter can't be a block
            let bytes = line.as_bytes();
            if bytes.len() <= 10 || bytes[4] != b'.' || bytes[10] != b';' {
                continue;
            }

            match (parse_hex(&bytes[0..4]), parse_hex(&bytes[6..10])) {
                (Some(start), Some(end)) => {
                    let name = line[11..].trim();
                    debug!("Found block: {name} = {start:04X}..{end:04X}");
                    blocks.push(Block::new(start, end, name));
                }
                _ => debug!("Ignoring malformed block line: {line:?}"),
            }
        }
        BlockTable { blocks }
    }

    /// Counts every code point in the corpus against each block containing it.
    pub fn tally(&mut self, corpus: &str) {
        for ch in corpus.chars() {
            let codepoint = ch as u32;
            for block in &mut self.blocks {
                if block.contains(codepoint) {
                    block.usage += 1;
                }
            }
        }
    }

    /// Counts the code points of a corpus that is not guaranteed to be valid UTF-8.
    pub fn tally_bytes(&mut self, corpus: &[u8]) {
        let decoded = String::from_utf8_lossy(corpus);
        if let std::borrow::Cow::Owned(_) = decoded {
            warn!("Corpus is not valid UTF-8. Invalid sequences are counted as U+FFFD.");
        }
        self.tally(&decoded);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn used_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(|x| x.is_used())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn parse_hex(digits: &[u8]) -> Option<u32> {
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u32::from_str_radix(std::str::from_utf8(digits).ok()?, 16).ok()
}

#[cfg(test)]
mod test {
    use crate::blocks::{Block, BlockTable};

    const BLOCKS: &str = "\
# Blocks-15.0.0.txt
# Date: 2022-01-28, 20:58:00 GMT [KW]

0000..007F; Basic Latin
0080..00FF; Latin-1 Supplement
0100..017F; Latin Extended-A
2000..206F; General Punctuation
10000..1007F; Linear B Syllabary
3040..309F; Hiragana
";

    #[test]
    fn test_parse() {
        let table = BlockTable::parse(BLOCKS);
        assert_eq!(table.blocks(), &[
            Block::new(0x0000, 0x007F, "Basic Latin"),
            Block::new(0x0080, 0x00FF, "Latin-1 Supplement"),
            Block::new(0x0100, 0x017F, "Latin Extended-A"),
            Block::new(0x2000, 0x206F, "General Punctuation"),
            Block::new(0x3040, 0x309F, "Hiragana"),
        ]);
    }

    #[test]
    fn test_parse_crlf() {
        let table = BlockTable::parse("0000..007F; Basic Latin\r\n0370..03FF; Greek and Coptic\r\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.blocks()[1].name, "Greek and Coptic");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(BlockTable::parse("0000..007F").is_empty());
        assert!(BlockTable::parse("00G0..007F; Broken").is_empty());
        assert!(BlockTable::parse("0000-.007F; Broken").is_empty());
        assert!(BlockTable::parse("0000..007F: Broken").is_empty());
        assert!(BlockTable::parse("").is_empty());

        // a bare terminator after the name is enough to qualify
        assert_eq!(BlockTable::parse("0000..007F;").len(), 1);
    }

    #[test]
    fn test_tally() {
        let mut table = BlockTable::parse(BLOCKS);
        table.tally("ab\u{2050}ひらがな");

        let usage: Vec<_> = table.blocks().iter().map(|x| x.usage).collect();
        assert_eq!(usage, [2, 0, 0, 1, 4]);

        let used: Vec<_> = table.used_blocks().map(|x| x.name.as_str()).collect();
        assert_eq!(used, ["Basic Latin", "General Punctuation", "Hiragana"]);
    }

    #[test]
    fn test_tally_overlapping() {
        let mut table = BlockTable::new(vec![
            Block::new(0x0000, 0x00FF, "Wide"),
            Block::new(0x0041, 0x005A, "Upper"),
        ]);
        table.tally("AAz");
        assert_eq!(table.blocks()[0].usage, 3);
        assert_eq!(table.blocks()[1].usage, 2);
    }

    #[test]
    fn test_tally_bytes() {
        let mut table = BlockTable::new(vec![
            Block::new(0x0000, 0x007F, "Basic Latin"),
            Block::new(0xFFF0, 0xFFFF, "Specials"),
        ]);
        table.tally_bytes(b"a\xFFb");
        assert_eq!(table.blocks()[0].usage, 2);
        assert_eq!(table.blocks()[1].usage, 1);
    }
}
