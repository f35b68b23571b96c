use crate::error::*;
use crate::types::*;
use std::collections::HashMap;

/// Decoded VORBIS_COMMENT block.
///
/// Field names are stored lower-cased, in the order they first appear.
/// Values under one name keep their order in the block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VorbisComment {
    pub vendor_length: u32,
    pub vendor: String,
    fields: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl VorbisComment {
    pub(crate) fn read(data: &[u8]) -> Result<Self> {
        let total = data.len();
        let mut data = data;

        let vendor = read_lstring(&mut data, total, "vendor string")?;
        let vendor_length = vendor.len() as u32;
        let vendor = String::from_utf8_lossy(vendor).into_owned();

        let num_entries = read_u32_le(&mut data, total, "entry count")?;

        let mut comment = VorbisComment {
            vendor_length,
            vendor,
            fields: Vec::new(),
            index: HashMap::new(),
        };
        for index in 0..num_entries {
            let entry = read_lstring(&mut data, total, "entry")?;
            let split = entry
                .iter()
                .position(|&b| b == b'=')
                .ok_or(FlacError::MissingDelimiter { index })?;

            let name = String::from_utf8_lossy(&entry[..split]).to_lowercase();
            let value = String::from_utf8_lossy(&entry[split + 1..]).into_owned();
            comment.push(name, value);
        }

        Ok(comment)
    }

    fn push(&mut self, name: String, value: String) {
        match self.index.get(&name) {
            Some(&slot) => self.fields[slot].1.push(value),
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, vec![value]));
            }
        }
    }

    /// All values for a field, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| self.fields[slot].1.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Field names with their values, in block order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn encode(vendor: &str, entries: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        out.extend_from_slice(vendor.as_bytes());
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for entry in entries {
            out.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            out.extend_from_slice(entry);
        }
        out
    }

    #[test]
    fn vendor_and_two_fields() {
        let data = encode("demo-encoder", &[b"TITLE=Song A", b"ARTIST=Band B"]);
        let comment = VorbisComment::read(&data).unwrap();

        assert_eq!(comment.vendor_length, 12);
        assert_eq!(comment.vendor, "demo-encoder");
        assert_eq!(comment.len(), 2);
        assert_eq!(comment.get("title").unwrap(), &["Song A"]);
        assert_eq!(comment.get("artist").unwrap(), &["Band B"]);
        let names: Vec<_> = comment.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["title", "artist"]);
    }

    #[test]
    fn repeated_names_accumulate() {
        let data = encode(
            "v",
            &[b"Artist=One", b"GENRE=Jazz", b"ARTIST=Two", b"artist=Three"],
        );
        let comment = VorbisComment::read(&data).unwrap();

        assert_eq!(comment.len(), 2);
        assert_eq!(comment.get("ARTIST").unwrap(), &["One", "Two", "Three"]);
        assert_eq!(comment.first("genre"), Some("Jazz"));
        let names: Vec<_> = comment.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["artist", "genre"]);
    }

    #[test]
    fn value_keeps_later_delimiters() {
        let data = encode("v", &[b"EQUATION=a=b=c", b"EMPTY="]);
        let comment = VorbisComment::read(&data).unwrap();
        assert_eq!(comment.first("equation"), Some("a=b=c"));
        assert_eq!(comment.first("empty"), Some(""));
    }

    #[test]
    fn empty_block() {
        let comment = VorbisComment::read(&encode("", &[])).unwrap();
        assert_eq!(comment.vendor_length, 0);
        assert!(comment.vendor.is_empty());
        assert!(comment.is_empty());
        assert_eq!(comment.get("title"), None);
    }

    #[test]
    fn many_distinct_names() {
        let entries: Vec<String> = (0..200_000).map(|i| format!("K{}=v{}", i, i)).collect();
        let refs: Vec<&[u8]> = entries.iter().map(|e| e.as_bytes()).collect();
        let comment = VorbisComment::read(&encode("v", &refs)).unwrap();

        assert_eq!(comment.len(), 200_000);
        assert_eq!(comment.first("k0"), Some("v0"));
        assert_eq!(comment.first("K199999"), Some("v199999"));
        assert_eq!(comment.iter().nth(1234).map(|(name, _)| name), Some("k1234"));
    }

    #[test]
    fn missing_delimiter_fails_block() {
        let data = encode("v", &[b"TITLE=ok", b"no delimiter here"]);
        match VorbisComment::read(&data) {
            Err(FlacError::MissingDelimiter { index: 1 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn entry_count_past_payload() {
        let mut data = encode("v", &[b"TITLE=x"]);
        data[5..9].copy_from_slice(&2u32.to_le_bytes());
        match VorbisComment::read(&data) {
            Err(FlacError::CommentOverrun { field: "entry", available: 0, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn vendor_length_past_payload() {
        let data = [0xff, 0, 0, 0, b'a'];
        match VorbisComment::read(&data) {
            Err(FlacError::CommentOverrun { field: "vendor string", offset: 4, wanted: 255, available: 1 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn lengths_are_little_endian() {
        // A big-endian reading of this vendor length would ask for 0x0c000000 bytes.
        let data = encode("demo-encoder", &[]);
        assert_eq!(&data[0..4], &[12, 0, 0, 0]);
        assert_eq!(VorbisComment::read(&data).unwrap().vendor_length, 12);
    }
}
