//! Import-declaration scanner for Go source files.
//!
//! Only the file header is read: the package clause and the import declarations that must
//! follow it. Everything after the last import is ignored.

use anyhow::{Context, bail};

/// Header of one Go source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoFileHeader {
    pub package: String,
    pub imports: Vec<ScannedImport>,
}

/// One import spec. `line`/`col` are 1-based; `col` counts bytes, like `go/token`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedImport {
    pub path: String,
    /// `_`, `.` or an identifier when the import is renamed.
    pub alias: Option<String>,
    pub line: u32,
    pub col: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Str(String),
    /// A terminated string literal whose escapes do not decode.
    BadStr(String),
    Punct(char),
}

#[derive(Clone, Debug)]
struct Token {
    tok: Tok,
    line: u32,
    col: u32,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Self {
            src,
            pos,
            line: 1,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn col(&self) -> u32 {
        (self.pos - self.line_start + 1) as u32
    }

    fn skip_trivia(&mut self) -> anyhow::Result<()> {
        loop {
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if rest.starts_with("/*") {
                let start_line = self.line;
                self.bump();
                self.bump();
                loop {
                    if self.src[self.pos..].starts_with("*/") {
                        self.bump();
                        self.bump();
                        break;
                    }
                    if self.bump().is_none() {
                        bail!("unterminated block comment starting on line {start_line}");
                    }
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> anyhow::Result<Option<Token>> {
        self.skip_trivia()?;
        let (line, col) = (self.line, self.col());
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let tok = if c == '_' || c.is_alphabetic() {
            let start = self.pos;
            while self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
                self.bump();
            }
            Tok::Ident(self.src[start..self.pos].to_string())
        } else if c == '"' {
            self.bump();
            self.interpreted_string(line)?
        } else if c == '`' {
            self.bump();
            Tok::Str(self.raw_string(line)?)
        } else {
            self.bump();
            Tok::Punct(c)
        };

        Ok(Some(Token { tok, line, col }))
    }

    /// Decode a double-quoted literal with Go's escape rules.
    fn interpreted_string(&mut self, line: u32) -> anyhow::Result<Tok> {
        let mut out: Vec<u8> = Vec::new();
        let mut bad: Option<String> = None;
        loop {
            match self.bump() {
                None | Some('\n') => bail!("unterminated string literal on line {line}"),
                Some('"') => break,
                Some('\\') => {
                    let Some(e) = self.bump() else {
                        bail!("unterminated string literal on line {line}");
                    };
                    if e == '\n' {
                        bail!("unterminated string literal on line {line}");
                    }
                    if let Err(reason) = self.escape(e, &mut out) {
                        bad.get_or_insert(reason);
                    }
                }
                Some(c) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        if let Some(reason) = bad {
            return Ok(Tok::BadStr(reason));
        }
        Ok(match String::from_utf8(out) {
            Ok(s) => Tok::Str(s),
            Err(_) => Tok::BadStr("invalid UTF-8".to_string()),
        })
    }

    fn escape(&mut self, e: char, out: &mut Vec<u8>) -> Result<(), String> {
        let byte = match e {
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            'v' => 0x0b,
            '\\' => b'\\',
            '"' => b'"',
            '0'..='7' => {
                let rest = self.digits(2, 8).ok_or("short octal escape")?;
                let value = (e as u32 - '0' as u32) * 64 + rest;
                u8::try_from(value).map_err(|_| format!("octal escape \\{e}.. out of range"))?
            }
            'x' => {
                let value = self.digits(2, 16).ok_or("short \\x escape")?;
                value as u8
            }
            'u' | 'U' => {
                let width = if e == 'u' { 4 } else { 8 };
                let value = self
                    .digits(width, 16)
                    .ok_or_else(|| format!("short \\{e} escape"))?;
                let c = char::from_u32(value).ok_or_else(|| format!("invalid code point {value:#x}"))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                return Ok(());
            }
            other => return Err(format!("unknown escape \\{other}")),
        };
        out.push(byte);
        Ok(())
    }

    /// Consume exactly `n` digits in `radix`, leaving the first non-digit unread.
    fn digits(&mut self, n: usize, radix: u32) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..n {
            let d = self.peek()?.to_digit(radix)?;
            self.bump();
            value = value * radix + d;
        }
        Some(value)
    }

    fn raw_string(&mut self, line: u32) -> anyhow::Result<String> {
        let start = self.pos;
        loop {
            match self.bump() {
                None => bail!("unterminated raw string literal on line {line}"),
                Some('`') => {
                    // Carriage returns are discarded from raw strings.
                    return Ok(self.src[start..self.pos - 1].replace('\r', ""));
                }
                Some(_) => {}
            }
        }
    }
}

/// Scan the package clause and import declarations of a Go source file.
///
/// Never panics; malformed headers are errors.
pub fn scan_go_file(text: &str) -> anyhow::Result<GoFileHeader> {
    let mut lx = Lexer::new(text);

    match lx.next_token()? {
        Some(Token {
            tok: Tok::Ident(kw), ..
        }) if kw == "package" => {}
        Some(t) => bail!("expected package clause on line {}", t.line),
        None => bail!("empty Go file"),
    }
    let package = match lx.next_token()? {
        Some(Token {
            tok: Tok::Ident(name),
            ..
        }) => name,
        _ => bail!("expected package name"),
    };

    let mut header = GoFileHeader {
        package,
        imports: Vec::new(),
    };

    loop {
        let Some(tok) = lx.next_token()? else { break };
        match tok.tok {
            Tok::Punct(';') => continue,
            Tok::Ident(kw) if kw == "import" => {}
            _ => break,
        }

        let next = lx.next_token()?.context("expected import spec")?;
        if next.tok == Tok::Punct('(') {
            loop {
                let t = lx.next_token()?.context("unterminated import group")?;
                match t.tok {
                    Tok::Punct(')') => break,
                    Tok::Punct(';') => continue,
                    _ => header.imports.extend(import_spec(&mut lx, t)?),
                }
            }
        } else {
            header.imports.extend(import_spec(&mut lx, next)?);
        }
    }

    Ok(header)
}

/// One import spec. `None` when the path literal cannot be decoded; that import is skipped.
fn import_spec(lx: &mut Lexer<'_>, first: Token) -> anyhow::Result<Option<ScannedImport>> {
    let (line, col) = (first.line, first.col);
    let (alias, path_tok) = match first.tok {
        Tok::Str(path) => {
            return Ok(Some(ScannedImport {
                path,
                alias: None,
                line,
                col,
            }));
        }
        Tok::BadStr(reason) => return Ok(skip_undecodable(&reason, line)),
        Tok::Ident(name) => (name, lx.next_token()?),
        Tok::Punct('.') => (".".to_string(), lx.next_token()?),
        Tok::Punct(c) => bail!("unexpected {c:?} in import declaration on line {line}"),
    };
    match path_tok {
        Some(Token {
            tok: Tok::Str(path),
            ..
        }) => Ok(Some(ScannedImport {
            path,
            alias: Some(alias),
            line,
            col,
        })),
        Some(Token {
            tok: Tok::BadStr(reason),
            ..
        }) => Ok(skip_undecodable(&reason, line)),
        _ => bail!("expected import path after {alias} on line {line}"),
    }
}

fn skip_undecodable(reason: &str, line: u32) -> Option<ScannedImport> {
    tracing::debug!(line, reason, "skipping import with undecodable path");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(h: &GoFileHeader) -> Vec<&str> {
        h.imports.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn grouped_imports_with_blank_aliases() {
        let src = "package a\n\nimport (\n\t_ \"encoding/base64\" // want\n\t_ \"encoding/json\"\n\t_ \"errors\"\n\t_ \"fmt\"\n)\n";
        let h = scan_go_file(src).expect("scan");
        assert_eq!(h.package, "a");
        assert_eq!(paths(&h), vec!["encoding/base64", "encoding/json", "errors", "fmt"]);
        let first = &h.imports[0];
        assert_eq!((first.line, first.col), (4, 2));
        assert_eq!(first.alias.as_deref(), Some("_"));
    }

    #[test]
    fn single_and_aliased_imports() {
        let src = r#"// Package doc.
package main

import "fmt"
import . "strings"
import j "encoding/json"; import "os"

func main() { fmt.Println("import \"nope\"") }
"#;
        let h = scan_go_file(src).expect("scan");
        assert_eq!(h.package, "main");
        assert_eq!(paths(&h), vec!["fmt", "strings", "encoding/json", "os"]);
        assert_eq!(h.imports[1].alias.as_deref(), Some("."));
        assert_eq!(h.imports[2].alias.as_deref(), Some("j"));
        assert_eq!((h.imports[0].line, h.imports[0].col), (4, 8));
    }

    #[test]
    fn comments_and_raw_strings() {
        let src = "/* header\n   import \"bogus\" */\npackage p // trailing\nimport (\n  /* inline */ `net/http`\n  // \"ignored\"\n)\n";
        let h = scan_go_file(src).expect("scan");
        assert_eq!(paths(&h), vec!["net/http"]);
        assert_eq!(h.imports[0].line, 5);
    }

    #[test]
    fn no_imports() {
        let h = scan_go_file("package empty\n\nvar x = 1\n").expect("scan");
        assert!(h.imports.is_empty());
    }

    #[test]
    fn external_test_package_name() {
        let h = scan_go_file("package a_test\nimport \"testing\"\n").expect("scan");
        assert_eq!(h.package, "a_test");
    }

    #[test]
    fn malformed_headers_are_errors() {
        assert!(scan_go_file("").is_err());
        assert!(scan_go_file("func main() {}").is_err());
        assert!(scan_go_file("package a\nimport (\n\"fmt\"\n").is_err());
        assert!(scan_go_file("package a\nimport \"fmt").is_err());
        assert!(scan_go_file("package a\n/* open").is_err());
        assert!(scan_go_file("package a\nimport x y").is_err());
    }

    #[test]
    fn go_escapes_in_import_paths_are_decoded() {
        let src = "package a\nimport (\n\t\"\\x65rrors\"\n\t\"\\u0066mt\"\n\t\"net\\057http\"\n\t\"\\U00000073trings\"\n)\n";
        let h = scan_go_file(src).expect("scan");
        assert_eq!(paths(&h), vec!["errors", "fmt", "net/http", "strings"]);
        assert_eq!(h.imports[2].line, 5);
    }

    #[test]
    fn undecodable_import_is_skipped_not_fatal() {
        let src = "package a\nimport (\n\t\"bad\\q\"\n\tx \"\\xZZ\"\n\t\"\\400\"\n\t\"\\xff\"\n\t\"fmt\"\n)\n";
        let h = scan_go_file(src).expect("scan");
        assert_eq!(paths(&h), vec!["fmt"]);
        assert_eq!(h.imports[0].line, 7);
    }

    #[test]
    fn byte_order_mark_and_unicode_are_tolerated() {
        let h = scan_go_file("\u{feff}package ünï\nimport \"日本/語\"\n").expect("scan");
        assert_eq!(h.package, "ünï");
        assert_eq!(paths(&h), vec!["日本/語"]);
    }
}
