//! Structural view of a root module file
//!
//! Only the parts the registrar touches are parsed: the import statements at
//! the top of the file and the `imports` array of the `@Module({ ... })`
//! decorator. Scanning runs over a masked copy of the source in which string
//! and comment contents are blanked, so brackets or keywords inside them never
//! count. Masking keeps byte offsets unchanged, so every offset found in the
//! mask indexes the original text.

use std::ops::Range;

/// The `imports: [ ... ]` array of the module decorator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportList {
    /// Offset of `[`
    pub open: usize,
    /// Offset of the matching `]`
    pub close: usize,
    /// Entries, trimmed, in source order
    pub entries: Vec<String>,
}

impl ImportList {
    /// Whether an entry is exactly `ident`
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.entries.iter().any(|entry| entry == ident)
    }
}

/// The `@Module({ ... })` decorator's object literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecorator {
    /// Offset of `{`
    pub open: usize,
    /// Offset of the matching `}`
    pub close: usize,
    /// The `imports` property, if the object has one
    pub imports: Option<ImportList>,
}

/// Parsed root module file
#[derive(Debug, Clone)]
pub struct ModuleFile<'a> {
    source: &'a str,
    /// Byte offset just past the last top-of-file import statement's line
    import_block_end: usize,
    decorator: Option<ModuleDecorator>,
}

/// One pending text insertion or replacement
struct Edit {
    range: Range<usize>,
    text: String,
}

impl<'a> ModuleFile<'a> {
    /// Parse `source`
    #[must_use]
    pub fn parse(source: &'a str) -> Self {
        let masked = mask(source);
        let decorator = find_decorator(source, &masked);
        let limit = decorator.as_ref().map_or(masked.len(), |d| d.open);
        let import_block_end = find_import_block_end(&masked, limit);

        Self {
            source,
            import_block_end,
            decorator,
        }
    }

    /// The module decorator, if present
    #[must_use]
    pub const fn decorator(&self) -> Option<&ModuleDecorator> {
        self.decorator.as_ref()
    }

    /// Entries of the decorator's `imports` array (empty if absent)
    #[must_use]
    pub fn import_entries(&self) -> &[String] {
        match self.decorator.as_ref().and_then(|d| d.imports.as_ref()) {
            Some(list) => &list.entries,
            None => &[],
        }
    }

    /// Offset where a new import statement goes
    #[must_use]
    pub const fn import_insert_offset(&self) -> usize {
        self.import_block_end
    }

    /// Produce new source text with `import_line` added to the import block
    /// and `ident` added to the decorator's `imports` array
    ///
    /// `ident` is not added again if the array already lists it. Returns the
    /// new text and whether a decorator was found to add `ident` to.
    #[must_use]
    pub fn with_registration(&self, import_line: &str, ident: &str) -> (String, bool) {
        let mut edits = Vec::new();

        let has_decorator = self.decorator.is_some();
        if let Some(decorator) = &self.decorator {
            match &decorator.imports {
                Some(list) if list.contains(ident) => {}
                Some(list) => edits.push(self.list_entry_edit(list, ident)),
                None => edits.push(self.imports_property_edit(decorator, ident)),
            }
        }

        edits.push(self.import_statement_edit(import_line));

        // Apply back to front so earlier offsets stay valid
        edits.sort_by_key(|edit| std::cmp::Reverse(edit.range.start));
        let mut text = self.source.to_string();
        for edit in edits {
            text.replace_range(edit.range, &edit.text);
        }

        (text, has_decorator)
    }

    fn import_statement_edit(&self, import_line: &str) -> Edit {
        let at = self.import_block_end;
        let needs_newline = at > 0 && !self.source[..at].ends_with('\n');
        let text = if needs_newline {
            format!("\n{import_line}\n")
        } else {
            format!("{import_line}\n")
        };
        Edit {
            range: at..at,
            text,
        }
    }

    fn list_entry_edit(&self, list: &ImportList, ident: &str) -> Edit {
        let inner = &self.source[list.open + 1..list.close];
        let at = list.open + 1;

        if inner.trim().is_empty() {
            return Edit {
                range: at..list.close,
                text: ident.to_string(),
            };
        }

        if inner.contains('\n') {
            let indent = indentation_of_first_token(self.source, at, list.close)
                .unwrap_or("    ");
            Edit {
                range: at..at,
                text: format!("\n{indent}{ident},"),
            }
        } else {
            Edit {
                range: at..at,
                text: format!("{ident}, "),
            }
        }
    }

    fn imports_property_edit(&self, decorator: &ModuleDecorator, ident: &str) -> Edit {
        let at = decorator.open + 1;
        let inner = &self.source[at..decorator.close];

        if inner.trim().is_empty() {
            return Edit {
                range: at..decorator.close,
                text: format!("\n  imports: [{ident}],\n"),
            };
        }

        if inner.contains('\n') {
            let indent = indentation_of_first_token(self.source, at, decorator.close)
                .unwrap_or("  ");
            Edit {
                range: at..at,
                text: format!("\n{indent}imports: [{ident}],"),
            }
        } else {
            Edit {
                range: at..at,
                text: format!(" imports: [{ident}],"),
            }
        }
    }
}

/// Blank out string and comment contents, keeping quotes, newlines and length
fn mask(source: &str) -> Vec<u8> {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    blank(&mut out, i);
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find(bytes, b"*/", i + 2).map_or(bytes.len(), |p| p + 2);
                for j in i..end {
                    blank(&mut out, j);
                }
                i = end;
            }
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        blank(&mut out, i);
                        i += 1;
                    }
                    blank(&mut out, i);
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    out
}

fn blank(out: &mut [u8], i: usize) {
    if out[i] != b'\n' {
        out[i] = b' ';
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|p| p + from)
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn skip_whitespace(masked: &[u8], mut i: usize) -> usize {
    while i < masked.len() && masked[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Offset of the bracket closing the one at `open`
fn matching_close(masked: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in masked.iter().enumerate().skip(open) {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `open+1..close` at commas that are not nested in brackets
fn top_level_segments(masked: &[u8], open: usize, close: usize) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = open + 1;
    for (i, &b) in masked.iter().enumerate().take(close).skip(open + 1) {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                segments.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(start..close);
    segments
}

fn find_decorator(source: &str, masked: &[u8]) -> Option<ModuleDecorator> {
    let mut from = 0;
    while let Some(at) = find(masked, b"@Module", from) {
        from = at + 1;
        let paren = skip_whitespace(masked, at + "@Module".len());
        if masked.get(paren) != Some(&b'(') {
            continue;
        }
        let open = skip_whitespace(masked, paren + 1);
        if masked.get(open) != Some(&b'{') {
            continue;
        }
        let close = matching_close(masked, open)?;
        let imports = find_imports_property(source, masked, open, close);
        return Some(ModuleDecorator {
            open,
            close,
            imports,
        });
    }
    None
}

fn find_imports_property(
    source: &str,
    masked: &[u8],
    open: usize,
    close: usize,
) -> Option<ImportList> {
    const KEY: &[u8] = b"imports";

    let mut depth = 0usize;
    let mut i = open + 1;
    while i < close {
        match masked[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0
                && masked[i..close].starts_with(KEY)
                && !is_ident_byte(masked[i - 1])
                && !masked.get(i + KEY.len()).copied().is_some_and(is_ident_byte) =>
            {
                let colon = skip_whitespace(masked, i + KEY.len());
                if masked.get(colon) == Some(&b':') {
                    let list_open = skip_whitespace(masked, colon + 1);
                    if masked.get(list_open) == Some(&b'[') {
                        let list_close = matching_close(masked, list_open)?;
                        let entries = top_level_segments(masked, list_open, list_close)
                            .into_iter()
                            .map(|range| source[range].trim().to_string())
                            .filter(|entry| !entry.is_empty())
                            .collect();
                        return Some(ImportList {
                            open: list_open,
                            close: list_close,
                            entries,
                        });
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Insertion offset after the last `import` statement that starts before `limit`
///
/// This is the start of the line after the statement, or the statement end
/// itself when its line runs into `limit` or the end of the file.
fn find_import_block_end(masked: &[u8], limit: usize) -> usize {
    let bounded = &masked[..limit.min(masked.len())];
    let mut block_end = 0;
    let mut line_start = 0;

    while line_start < bounded.len() {
        let token = skip_inline_space(bounded, line_start);
        let scan_from = if is_import_keyword(bounded, token) {
            let end = import_statement_end(bounded, token);
            block_end = find(bounded, b"\n", end).map_or(end, |p| p + 1);
            end
        } else {
            line_start
        };
        line_start = find(bounded, b"\n", scan_from).map_or(bounded.len(), |p| p + 1);
    }

    block_end
}

fn skip_inline_space(masked: &[u8], mut i: usize) -> usize {
    while i < masked.len() && (masked[i] == b' ' || masked[i] == b'\t') {
        i += 1;
    }
    i
}

/// `import` as a statement keyword, not `importer`, `import(...)` or `import.meta`
fn is_import_keyword(masked: &[u8], at: usize) -> bool {
    masked[at..].starts_with(b"import")
        && !masked
            .get(at + "import".len())
            .is_some_and(|&b| is_ident_byte(b) || b == b'(' || b == b'.')
}

/// End of the import statement starting at `at`
///
/// The statement ends at the closing quote of its module specifier, taking a
/// trailing `;` along if there is one. Semicolons are optional in TypeScript,
/// so a later `;` says nothing about where an import ends. Without a
/// specifier the statement ends with its line.
fn import_statement_end(masked: &[u8], at: usize) -> usize {
    let line_end = find(masked, b"\n", at).unwrap_or(masked.len());
    let Some(open) = masked[at..]
        .iter()
        .position(|&b| b == b'\'' || b == b'"')
        .map(|p| p + at)
    else {
        return line_end;
    };
    let Some(close) = masked[open + 1..]
        .iter()
        .position(|&b| b == masked[open])
        .map(|p| p + open + 1)
    else {
        return masked.len();
    };

    let after = skip_inline_space(masked, close + 1);
    if masked.get(after) == Some(&b';') {
        after + 1
    } else {
        close + 1
    }
}

/// Leading whitespace of the line holding the first non-blank byte in `from..to`
fn indentation_of_first_token(source: &str, from: usize, to: usize) -> Option<&str> {
    let offset = source[from..to].find(|c: char| !c.is_whitespace())? + from;
    let line_start = source[..offset].rfind('\n').map_or(0, |p| p + 1);
    let indent = &source[line_start..offset];
    indent
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some(indent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_MODULE: &str = "import { Module } from '@nestjs/common';
import { AppController } from './app.controller';
import { AppService } from './app.service';

@Module({
  imports: [
    ConfigModule.forRoot({ isGlobal: true }),
    UserModule,
  ],
  controllers: [AppController],
  providers: [AppService],
})
export class AppModule {}
";

    #[test]
    fn test_mask_blanks_strings_and_comments() {
        let masked = mask("a('[x]') // ]\n/* { */b");
        assert_eq!(String::from_utf8(masked).unwrap(), "a('   ')     \n       b");
    }

    #[test]
    fn test_parses_decorator_imports() {
        let file = ModuleFile::parse(APP_MODULE);
        assert_eq!(
            file.import_entries(),
            ["ConfigModule.forRoot({ isGlobal: true })", "UserModule"]
        );
    }

    #[test]
    fn test_import_block_ends_after_last_import() {
        let file = ModuleFile::parse(APP_MODULE);
        let expected = APP_MODULE.find("\n\n@Module").unwrap() + 1;
        assert_eq!(file.import_insert_offset(), expected);
    }

    #[test]
    fn test_multiline_import_statement() {
        let source = "import {\n  A,\n  B,\n} from './ab';\n\n@Module({ imports: [] })\nexport class X {}\n";
        let file = ModuleFile::parse(source);
        assert_eq!(file.import_insert_offset(), source.find("\n\n@Module").unwrap() + 1);
    }

    #[test]
    fn test_ignores_brackets_in_strings_and_comments() {
        let source = "// imports: [Fake]\n@Module({\n  // imports: [Nope]\n  providers: [{ provide: 'imports: [', useValue: 1 }],\n  imports: [RealModule],\n})\nexport class AppModule {}\n";
        let file = ModuleFile::parse(source);
        assert_eq!(file.import_entries(), ["RealModule"]);
    }

    #[test]
    fn test_nested_imports_key_is_not_top_level() {
        let source = "@Module({\n  providers: [{ imports: [Inner] }],\n})\nexport class AppModule {}\n";
        let file = ModuleFile::parse(source);
        assert!(file.decorator().unwrap().imports.is_none());
    }

    #[test]
    fn test_adds_entry_to_multiline_list() {
        let file = ModuleFile::parse(APP_MODULE);
        let line = "import { WidgetModule } from './widget/widget.module';";
        let (text, has_decorator) = file.with_registration(line, "WidgetModule");

        assert!(has_decorator);
        assert!(text.contains(
            "import { AppService } from './app.service';\nimport { WidgetModule } from './widget/widget.module';\n\n@Module"
        ));
        assert!(text.contains("  imports: [\n    WidgetModule,\n    ConfigModule.forRoot"));
    }

    #[test]
    fn test_adds_entry_to_empty_list() {
        let source = "import { Module } from '@nestjs/common';\n\n@Module({\n  imports: [],\n  controllers: [],\n})\nexport class AppModule {}\n";
        let (text, _) = ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert!(text.contains("  imports: [WModule],\n"));
    }

    #[test]
    fn test_adds_entry_to_single_line_list() {
        let source = "@Module({ imports: [AModule], providers: [] })\nexport class AppModule {}\n";
        let (text, _) = ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert_eq!(
            text,
            "import { WModule } from './w/w.module';\n@Module({ imports: [WModule, AModule], providers: [] })\nexport class AppModule {}\n"
        );
    }

    #[test]
    fn test_creates_missing_imports_property() {
        let source = "import { Module } from '@nestjs/common';\n\n@Module({\n  controllers: [],\n})\nexport class AppModule {}\n";
        let (text, _) = ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert!(text.contains("@Module({\n  imports: [WModule],\n  controllers: [],\n})"));
    }

    #[test]
    fn test_existing_entry_is_not_duplicated() {
        let line = "import { UserModule } from './user/user.module';";
        let (text, _) = ModuleFile::parse(APP_MODULE).with_registration(line, "UserModule");
        assert_eq!(text.matches("UserModule,").count(), 1);
        assert!(text.contains(line));
    }

    #[test]
    fn test_without_decorator_only_import_is_added() {
        let source = "export const x = 1;\n";
        let (text, has_decorator) =
            ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert!(!has_decorator);
        assert_eq!(text, "import { WModule } from './w/w.module';\nexport const x = 1;\n");
    }

    #[test]
    fn test_import_without_trailing_newline() {
        let source = "import { A } from './a';";
        let (text, _) = ModuleFile::parse(source).with_registration("import { B } from './b';", "B");
        assert_eq!(text, "import { A } from './a';\nimport { B } from './b';\n");
    }

    #[test]
    fn test_semicolon_free_imports_stop_before_decorator() {
        let source = "import { Module } from '@nestjs/common'
import { ConfigModule } from '@nestjs/config'

@Module({
  imports: [
    ConfigModule.forRoot({ load: [() => { return { a: 1 }; }] }),
  ],
})
export class AppModule {}
";
        let file = ModuleFile::parse(source);
        assert_eq!(file.import_insert_offset(), source.find("\n\n@Module").unwrap() + 1);

        let (text, _) = file.with_registration("import { WModule } from './w/w.module';", "WModule");
        assert_eq!(
            text,
            "import { Module } from '@nestjs/common'
import { ConfigModule } from '@nestjs/config'
import { WModule } from './w/w.module';

@Module({
  imports: [
    WModule,
    ConfigModule.forRoot({ load: [() => { return { a: 1 }; }] }),
  ],
})
export class AppModule {}
"
        );
    }

    #[test]
    fn test_file_without_any_semicolon() {
        let source = "import { Module } from '@nestjs/common'\n\n@Module({\n  imports: [],\n})\nexport class AppModule {}\n";
        let (text, _) = ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert_eq!(
            text,
            "import { Module } from '@nestjs/common'\nimport { WModule } from './w/w.module';\n\n@Module({\n  imports: [WModule],\n})\nexport class AppModule {}\n"
        );
    }

    #[test]
    fn test_commented_imports_are_skipped() {
        let source = "import { Module } from '@nestjs/common';
// import { Legacy } from './legacy';
/* import { Old } from './old'; */
import { AppService } from './app.service';
// import { Later } from './later';
/**
 * Root module
 */
@Module({ imports: [] })
export class AppModule {}
";
        let file = ModuleFile::parse(source);
        assert_eq!(
            file.import_insert_offset(),
            source.find("// import { Later }").unwrap()
        );
    }

    #[test]
    fn test_decorator_on_last_import_line() {
        let source = "import { Module } from '@nestjs/common'; @Module({ imports: [] })\nexport class AppModule {}\n";
        let (text, _) = ModuleFile::parse(source).with_registration("import { WModule } from './w/w.module';", "WModule");
        assert_eq!(
            text,
            "import { Module } from '@nestjs/common';\nimport { WModule } from './w/w.module';\n @Module({ imports: [WModule] })\nexport class AppModule {}\n"
        );
    }

    #[test]
    fn test_dynamic_import_is_not_a_statement() {
        let source = "import { Module } from '@nestjs/common';\nimport('./polyfill');\n\n@Module({ imports: [] })\nexport class AppModule {}\n";
        let file = ModuleFile::parse(source);
        assert_eq!(file.import_insert_offset(), source.find("import('").unwrap());
    }
}
