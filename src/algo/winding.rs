//! Triangle winding reversal.
//!
//! Works on the raw lines of an [`ObjDocument`] so that positions, normals and
//! texture coordinates are written back exactly as they were read.

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::io::obj::split_tag;
use crate::io::ObjDocument;

/// Reverse the winding of every face by swapping its first and third
/// index groups.
///
/// Every face must have exactly three groups. The document is only modified
/// once all faces have been checked, so on error it is left as it was.
///
/// Returns the number of faces rewritten.
///
/// # Example
///
/// ```
/// use spheremap::algo::winding::reverse_winding;
/// use spheremap::io::ObjDocument;
///
/// let mut doc = ObjDocument::read("f 1/1/1 2/2/2 3/3/3\n".as_bytes()).unwrap();
/// reverse_winding(&mut doc).unwrap();
/// assert_eq!(doc.faces[0].1, "f 3/3/3 2/2/2 1/1/1");
/// ```
pub fn reverse_winding(doc: &mut ObjDocument) -> Result<usize> {
    let reversed = doc
        .faces
        .iter()
        .map(|(line, text)| {
            let (_, rest) = split_tag(text.trim());
            let groups: Vec<&str> = rest.split_whitespace().collect();
            match groups.as_slice() {
                [a, b, c] => Ok(format!("f {} {} {}", c, b, a)),
                _ => Err(MeshError::NonTriangularFace {
                    line: *line,
                    count: groups.len(),
                }),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    for ((_, text), face) in doc.faces.iter_mut().zip(reversed) {
        *text = face;
    }

    debug!("Reversed winding of {} faces", doc.faces.len());
    Ok(doc.faces.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> ObjDocument {
        ObjDocument::read(text.as_bytes()).unwrap()
    }

    fn render(doc: &ObjDocument) -> String {
        let mut out = Vec::new();
        doc.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_reverse_groups() {
        let mut d = doc("v 1 0 0\nv 0 1 0\nv 0 0 1\nf 1//1   2//2 3//3\nf 3 1 2\n");
        assert_eq!(reverse_winding(&mut d).unwrap(), 2);
        assert_eq!(
            render(&d),
            "v 1 0 0\nv 0 1 0\nv 0 0 1\nf 3//3 2//2 1//1\nf 2 1 3\n"
        );
    }

    #[test]
    fn test_reverse_is_involution() {
        let text = "o Ball\nv 1 0 0\nv 0 1 0\nv 0 0 1\nvn 0 1 0\nvt 0.5 0.5\nf 1/1/1 2/1/1 3/1/1\nf 3/1/1 2/1/1 1/1/1\n";
        let mut d = doc(text);
        reverse_winding(&mut d).unwrap();
        assert_ne!(render(&d), text);
        reverse_winding(&mut d).unwrap();
        assert_eq!(render(&d), text);
    }

    #[test]
    fn test_quad_is_rejected() {
        let mut d = doc("v 0 0 0\nf 1 2 3\n\nf 1 2 3 4\n");
        let before = d.clone();
        match reverse_winding(&mut d) {
            Err(MeshError::NonTriangularFace { line, count }) => {
                assert_eq!(line, 4);
                assert_eq!(count, 4);
            }
            other => panic!("expected NonTriangularFace, got {:?}", other),
        }
        assert_eq!(d, before);
    }

    #[test]
    fn test_empty_document() {
        let mut d = ObjDocument::default();
        assert_eq!(reverse_winding(&mut d).unwrap(), 0);
        assert_eq!(render(&d), "");
    }
}
