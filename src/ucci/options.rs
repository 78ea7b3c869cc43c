use std::io::{self, Write};

/// Default transposition table size in MB
pub const DEFAULT_HASH_MB: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UcciOptionAction {
    ResizeHash(usize),
    UseBook(bool),
    LoadBook(String),
}

#[derive(Debug, Clone)]
pub struct UcciOptions {
    pub hash_mb: usize,
    pub use_book: bool,
    pub book_path: Option<String>,
}

impl Default for UcciOptions {
    fn default() -> Self {
        UcciOptions {
            hash_mb: DEFAULT_HASH_MB,
            use_book: true,
            book_path: None,
        }
    }
}

impl UcciOptions {
    /// Identity and option lines answering `ucci`, ending with `ucciok`.
    ///
    /// # Errors
    /// Returns the error from writing to `out`.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name xiangqi_engine {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(
            out,
            "option hashsize type spin min 1 max 4096 default {}",
            self.hash_mb
        )?;
        writeln!(out, "option usebook type check default {}", self.use_book)?;
        writeln!(
            out,
            "option bookfiles type string default {}",
            self.book_path.as_deref().unwrap_or("<empty>")
        )?;
        writeln!(out, "ucciok")
    }

    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>) -> Option<UcciOptionAction> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hashsize" => {
                let mb = value
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(DEFAULT_HASH_MB)
                    .max(1);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return Some(UcciOptionAction::ResizeHash(mb));
                }
            }
            "usebook" => {
                let on = value.map_or(true, |v| {
                    matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "on" | "1")
                });
                self.use_book = on;
                return Some(UcciOptionAction::UseBook(on));
            }
            "bookfiles" => {
                let path = value?.trim().to_string();
                if path.is_empty() {
                    return None;
                }
                self.book_path = Some(path.clone());
                return Some(UcciOptionAction::LoadBook(path));
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_ends_with_ucciok() {
        let mut out = Vec::new();
        UcciOptions::default().print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("id name xiangqi_engine"));
        assert_eq!(text.lines().last(), Some("ucciok"));
    }

    #[test]
    fn hashsize_resizes_only_on_change() {
        let mut options = UcciOptions::default();
        assert_eq!(options.apply_setoption("hashsize", Some("64")), None);
        assert_eq!(
            options.apply_setoption("HashSize", Some("16")),
            Some(UcciOptionAction::ResizeHash(16))
        );
        assert_eq!(options.hash_mb, 16);
    }

    #[test]
    fn book_options() {
        let mut options = UcciOptions::default();
        assert_eq!(
            options.apply_setoption("usebook", Some("false")),
            Some(UcciOptionAction::UseBook(false))
        );
        assert_eq!(
            options.apply_setoption("bookfiles", Some("BOOK.DAT")),
            Some(UcciOptionAction::LoadBook("BOOK.DAT".to_string()))
        );
        assert_eq!(options.apply_setoption("bookfiles", None), None);
        assert_eq!(options.apply_setoption("nonsense", Some("1")), None);
    }
}
