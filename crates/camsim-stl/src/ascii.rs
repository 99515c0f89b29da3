//! ASCII STL: a line-oriented keyword state machine and the text writer.
//!
//! Keywords are matched case-insensitively. A file may hold several
//! `solid ... endsolid` blocks; after each block the next non-blank line is
//! inspected and parsing continues only if it opens another solid.

use std::io::Write;

use camsim_math::{lit, Point3, Scalar};
use camsim_mesh::{Facet, Mesh, TriangleVector};
use tracing::{debug, warn};

use crate::binary::to_stl_float;
use crate::error::{Result, StlError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Solid,
    Facet,
    Outer,
    Vertex,
    EndLoop,
    EndFacet,
    EndSolid,
    /// Two-word closers: `end loop`, `end facet`, `end solid`.
    End,
}

impl Keyword {
    fn lookup(word: &str) -> Option<Self> {
        Some(match word {
            "solid" => Self::Solid,
            "facet" => Self::Facet,
            "outer" | "outerloop" => Self::Outer,
            "vertex" => Self::Vertex,
            "endloop" => Self::EndLoop,
            "endfacet" => Self::EndFacet,
            "endsolid" => Self::EndSolid,
            "end" => Self::End,
            _ => return None,
        })
    }
}

/// Triangles and metadata collected from ASCII text.
#[derive(Debug)]
pub(crate) struct AsciiContents<T: Scalar> {
    pub triangles: TriangleVector<T>,
    pub solid_name: Option<String>,
}

struct AsciiParser<T: Scalar> {
    in_solid: bool,
    in_facet: bool,
    in_loop: bool,
    normal: Point3<T>,
    vertices: Vec<Point3<T>>,
    use_file_normals: bool,
    solid_name: Option<String>,
    triangles: TriangleVector<T>,
}

impl<T: Scalar> AsciiParser<T> {
    fn new(precision: T, use_file_normals: bool) -> Self {
        Self {
            in_solid: false,
            in_facet: false,
            in_loop: false,
            normal: Point3::zero(),
            vertices: Vec::with_capacity(3),
            use_file_normals,
            solid_name: None,
            triangles: TriangleVector::new(precision),
        }
    }

    fn is_complete(&self) -> bool {
        !self.in_solid && !self.in_facet && !self.in_loop
    }

    fn parse_line(&mut self, raw: &str, line: usize) -> Result<()> {
        let lower = raw.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();
        let Some(keyword) = Keyword::lookup(tokens[0]) else {
            return Err(StlError::UnknownKeyword {
                line,
                text: raw.to_string(),
            });
        };
        match keyword {
            Keyword::Solid => {
                if self.in_solid {
                    return Err(StlError::syntax(line, "solid"));
                }
                self.in_solid = true;
                if self.solid_name.is_none() {
                    self.solid_name = raw
                        .split_once(char::is_whitespace)
                        .map(|(_, name)| name.trim().to_string())
                        .filter(|name| !name.is_empty());
                }
            }
            Keyword::Facet => {
                if tokens.len() != 5 || tokens[1] != "normal" {
                    return Err(StlError::parameters(line, "facet"));
                }
                if !self.in_solid || self.in_facet {
                    return Err(StlError::syntax(line, "facet"));
                }
                self.in_facet = true;
                self.normal = parse_point(&tokens[2..5], line)?;
            }
            Keyword::Outer => {
                if !matches!(tokens.as_slice(), ["outer", "loop"] | ["outerloop"]) {
                    return Err(StlError::parameters(line, "outer"));
                }
                if !self.in_facet || self.in_loop {
                    return Err(StlError::syntax(line, "outer loop"));
                }
                self.in_loop = true;
            }
            Keyword::Vertex => {
                if tokens.len() != 4 {
                    return Err(StlError::parameters(line, "vertex"));
                }
                if !(self.in_solid && self.in_facet && self.in_loop) {
                    return Err(StlError::syntax(line, "vertex"));
                }
                let p = parse_point(&tokens[1..4], line)?;
                if self.vertices.len() < 3 {
                    self.vertices.push(p);
                }
            }
            Keyword::EndLoop => {
                if tokens.len() > 1 {
                    return Err(StlError::parameters(line, "endloop"));
                }
                self.end_loop(line)?;
            }
            Keyword::EndFacet => self.end_facet(line)?,
            Keyword::EndSolid => self.end_solid(line)?,
            Keyword::End => match tokens.as_slice() {
                ["end", "loop"] => self.end_loop(line)?,
                ["end", "facet"] => self.end_facet(line)?,
                ["end", "solid", ..] => self.end_solid(line)?,
                _ => return Err(StlError::parameters(line, "end")),
            },
        }
        Ok(())
    }

    fn end_loop(&mut self, line: usize) -> Result<()> {
        if !self.in_loop {
            return Err(StlError::syntax(line, "endloop"));
        }
        self.in_loop = false;
        let vertices = std::mem::take(&mut self.vertices);
        let &[a, b, c] = vertices.as_slice() else {
            debug!(line, count = vertices.len(), "skipping loop without three vertices");
            return Ok(());
        };
        let mut facet = Facet::new(a, b, c);
        if self.use_file_normals && !self.normal.is_exactly_zero() {
            facet.normal = self.normal;
        }
        self.triangles.add_facet(facet)?;
        Ok(())
    }

    fn end_facet(&mut self, line: usize) -> Result<()> {
        if !self.in_facet || self.in_loop {
            return Err(StlError::syntax(line, "endfacet"));
        }
        self.in_facet = false;
        Ok(())
    }

    fn end_solid(&mut self, line: usize) -> Result<()> {
        if !self.in_solid || self.in_facet {
            return Err(StlError::syntax(line, "endsolid"));
        }
        self.in_solid = false;
        Ok(())
    }
}

fn parse_point<T: Scalar>(tokens: &[&str], line: usize) -> Result<Point3<T>> {
    let mut c = [T::zero(); 3];
    for (slot, token) in c.iter_mut().zip(tokens) {
        let v: f64 = token.parse().map_err(|_| StlError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
        *slot = lit(v);
    }
    Ok(Point3::from(c))
}

/// First word of the next non-blank line, lowercased.
fn peek_keyword(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .and_then(|l| l.split_whitespace().next())
        .map(str::to_lowercase)
}

/// Parse ASCII STL text into a triangle accumulator.
///
/// Nothing is returned on failure, so a caller's mesh is never left half
/// filled.
pub(crate) fn parse_ascii<T: Scalar>(
    text: &str,
    precision: T,
    use_file_normals: bool,
) -> Result<AsciiContents<T>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut parser = AsciiParser::new(precision, use_file_normals);
    let mut next = 0;
    while next < lines.len() {
        let raw = lines[next].trim();
        next += 1;
        if raw.is_empty() {
            continue;
        }
        parser.parse_line(raw, next)?;
        if parser.is_complete() {
            if peek_keyword(&lines[next..]).as_deref() != Some("solid") {
                break;
            }
            debug!(line = next + 1, "continuing with next solid");
        }
    }
    if !parser.is_complete() {
        warn!(
            triangles = parser.triangles.len(),
            "STL text ended inside an open block"
        );
    }
    Ok(AsciiContents {
        triangles: parser.triangles,
        solid_name: parser.solid_name,
    })
}

fn coords<T: Scalar>(p: &Point3<T>, truncate: bool) -> String {
    if truncate {
        let [x, y, z] = p.to_array().map(to_stl_float);
        format!("{x} {y} {z}")
    } else {
        format!("{} {} {}", p.x, p.y, p.z)
    }
}

/// Write `mesh` as ASCII STL.
pub(crate) fn write_ascii<T: Scalar, W: Write>(
    mesh: &Mesh<T>,
    truncate: bool,
    mut writer: W,
) -> Result<()> {
    writeln!(writer, "solid ascii")?;
    for facet in mesh.facets() {
        writeln!(writer, "  facet normal {}", coords(&facet.normal, truncate))?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            writeln!(writer, "      vertex {}", coords(v, truncate))?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = "solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid
";

    fn parse(text: &str) -> Result<AsciiContents<f64>> {
        parse_ascii(text, 1e-12, true)
    }

    #[test]
    fn test_single_facet() {
        let parsed = parse(SINGLE).unwrap();
        assert_eq!(parsed.triangles.len(), 1);
        let f = parsed.triangles.facets()[0];
        assert_eq!(f.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(f.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(f.vertices[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(f.normal, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(parsed.solid_name.as_deref(), Some("test"));
    }

    #[test]
    fn test_vertex_outside_loop_fails() {
        let text = "solid bad\n facet normal 0 0 1\n vertex 0 0 0\n";
        assert!(matches!(
            parse(text),
            Err(StlError::InvalidSyntax { line: 3, .. })
        ));
    }

    #[test]
    fn test_nested_keywords_fail() {
        assert!(matches!(
            parse("solid a\nsolid b\n"),
            Err(StlError::InvalidSyntax { line: 2, .. })
        ));
        assert!(matches!(
            parse("solid a\nendfacet\n"),
            Err(StlError::InvalidSyntax { .. })
        ));
        assert!(matches!(
            parse("endsolid\n"),
            Err(StlError::InvalidSyntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_keyword_reports_line() {
        let err = parse("solid a\n  bogus 1 2 3\n").unwrap_err();
        match err {
            StlError::UnknownKeyword { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "bogus 1 2 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_parameters() {
        let facet = "solid a\nfacet normal 0 0\n";
        assert!(matches!(parse(facet), Err(StlError::InvalidParameters { .. })));
        let number = "solid a\nfacet normal 0 0 x\n";
        assert!(matches!(
            parse(number),
            Err(StlError::InvalidNumber { line: 2, .. })
        ));
        let outer = "solid a\nfacet normal 0 0 1\nouter ring\n";
        assert!(matches!(parse(outer), Err(StlError::InvalidParameters { .. })));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        for (from, to) in [
            ("facet normal 0 0 1", "facet bogus 0 0 1"),
            ("outer loop", "outer"),
            ("outer loop", "outer loop extra"),
            ("endloop", "end"),
        ] {
            let text = SINGLE.replace(from, to);
            assert!(
                matches!(parse(&text), Err(StlError::InvalidParameters { .. })),
                "accepted {to:?}"
            );
        }
        assert_eq!(parse(&SINGLE.replace("outer loop", "outerloop")).unwrap().triangles.len(), 1);
    }

    #[test]
    fn test_closers_require_inner_blocks_closed() {
        let open_facet = "solid a\nfacet normal 0 0 1\nendsolid\nsolid b\nouter loop\n";
        assert!(matches!(
            parse(open_facet),
            Err(StlError::InvalidSyntax { line: 3, .. })
        ));
        let open_loop = "solid a\nfacet normal 0 0 1\nouter loop\nendfacet\n";
        assert!(matches!(
            parse(open_loop),
            Err(StlError::InvalidSyntax { line: 4, .. })
        ));
        let split = "solid a\nfacet normal 0 0 1\nouter loop\nend facet\n";
        assert!(matches!(parse(split), Err(StlError::InvalidSyntax { .. })));
    }

    #[test]
    fn test_case_insensitive_and_split_closers() {
        let text = "SOLID Part\nFacet Normal 0 0 0\nOuter Loop\nVERTEX 0 0 0\nvertex 2 0 0\nvertex 0 2 0\nEnd Loop\nend facet\nend solid\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.triangles.len(), 1);
        // Zero normal is recomputed from the winding.
        assert_eq!(parsed.triangles.facets()[0].normal, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(parsed.solid_name.as_deref(), Some("Part"));
    }

    #[test]
    fn test_declared_normal_ignored_on_request() {
        let text = SINGLE.replace("facet normal 0 0 1", "facet normal 1 0 0");
        let kept = parse(&text).unwrap();
        assert_eq!(kept.triangles.facets()[0].normal, Point3::new(1.0, 0.0, 0.0));
        let recomputed = parse_ascii::<f64>(&text, 1e-12, false).unwrap();
        assert_eq!(
            recomputed.triangles.facets()[0].normal,
            Point3::new(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_multiple_solids() {
        let text = format!("{SINGLE}\n\n{}", SINGLE.replace("solid test", "solid other"));
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.triangles.len(), 2);
        assert_eq!(parsed.solid_name.as_deref(), Some("test"));
    }

    #[test]
    fn test_stops_after_last_solid() {
        let text = format!("{SINGLE}trailing garbage here\n");
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.triangles.len(), 1);
    }

    #[test]
    fn test_degenerate_facet_skipped() {
        let text = SINGLE.replace("vertex 1 0 0", "vertex 0 0 0");
        let parsed = parse(&text).unwrap();
        assert!(parsed.triangles.is_empty());
    }

    #[test]
    fn test_writer_output_parses_back() {
        let mut tv = TriangleVector::new(1e-12);
        tv.add_triangle(
            Point3::new(0.5, 0.25, 0.0),
            Point3::new(1.5, 0.25, 0.0),
            Point3::new(0.5, 1.25, 0.0),
        )
        .unwrap();
        let mut mesh = Mesh::default();
        mesh.set_triangles(&tv);
        let mut out = Vec::new();
        write_ascii(&mesh, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("solid ascii\n  facet normal 0 0 1\n    outer loop\n"));
        assert!(text.contains("      vertex 1.5 0.25 0\n"));
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.triangles.facets()[0].vertices, tv.facets()[0].vertices);
    }
}
