//! Line-level view of an OBJ file.
//!
//! [`ObjDocument`] keeps the `o`, `v`, `vn`, `vt` and `f` lines of a file as
//! text, grouped by tag. It is used by tools that rewrite one kind of line and
//! must leave every other line exactly as it was.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{MeshError, Result};

use super::obj::split_tag;

/// The tagged lines of an OBJ file, grouped into sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjDocument {
    /// `o` lines.
    pub objects: Vec<String>,
    /// `v` lines.
    pub positions: Vec<String>,
    /// `vn` lines.
    pub normals: Vec<String>,
    /// `vt` lines.
    pub tex_coords: Vec<String>,
    /// `f` lines, each paired with its 1-based source line number.
    pub faces: Vec<(usize, String)>,
}

impl ObjDocument {
    /// Load a document from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MeshError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::read(BufReader::new(file)).map_err(|e| e.with_load_path(path))
    }

    /// Read a document from OBJ text. Lines with other tags are dropped.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut doc = Self::default();
        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let (tag, _) = split_tag(line.trim());
            match tag {
                "o" => doc.objects.push(line),
                "v" => doc.positions.push(line),
                "vn" => doc.normals.push(line),
                "vt" => doc.tex_coords.push(line),
                "f" => doc.faces.push((line_idx + 1, line)),
                _ => {}
            }
        }
        Ok(doc)
    }

    /// Write the sections in the order `o`, `v`, `vn`, `vt`, `f`.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let sections = [
            &self.objects,
            &self.positions,
            &self.normals,
            &self.tex_coords,
        ];
        for line in sections.into_iter().flatten() {
            writeln!(writer, "{}", line)?;
        }
        for (_, line) in &self.faces {
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_reordered() {
        let text = "v 1 0 0\no Ball\nf 1 2 3\nvt 0 0\nvn 0 1 0\nv 0 1 0\nusemtl skin\nv 0 0 1\n";
        let doc = ObjDocument::read(text.as_bytes()).unwrap();
        assert_eq!(doc.objects, vec!["o Ball"]);
        assert_eq!(doc.positions.len(), 3);
        assert_eq!(doc.faces, vec![(3, "f 1 2 3".to_string())]);

        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "o Ball\nv 1 0 0\nv 0 1 0\nv 0 0 1\nvn 0 1 0\nvt 0 0\nf 1 2 3\n"
        );
    }

    #[test]
    fn test_lines_kept_verbatim() {
        let text = "v  1.0   0.0 0.0\nvn 0.0000 1.0000 0.0000\n";
        let doc = ObjDocument::read(text.as_bytes()).unwrap();
        assert_eq!(doc.positions, vec!["v  1.0   0.0 0.0"]);
        assert_eq!(doc.normals, vec!["vn 0.0000 1.0000 0.0000"]);
    }
}
