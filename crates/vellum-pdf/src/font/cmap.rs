//! ToUnicode CMap generation.
//!
//! [PDF 32000-1:2008 § 9.10.3 ToUnicode CMaps]
//!
//! Maps each subset CID back to its Unicode code point(s) so readers can
//! extract and search text shown through Identity-H encoding.

use std::io::Write;

/// Build a ToUnicode CMap stream mapping `(cid, text)` pairs.
///
/// Entries are chunked at 100 per `beginbfchar` block as the CMap format
/// requires; the target text is encoded UTF-16BE.
#[must_use]
pub fn build_to_unicode(mappings: &[(u16, String)]) -> Vec<u8> {
    let mut out = b"/CIDInit /ProcSet findresource begin\n\
12 dict begin\n\
begincmap\n\
/CIDSystemInfo\n\
<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
/CMapName /Adobe-Identity-UCS def\n\
/CMapType 2 def\n\
1 begincodespacerange\n\
<0000> <ffff>\n\
endcodespacerange\n"
        .to_vec();

    let mut pairs: Vec<&(u16, String)> = mappings.iter().collect();
    pairs.sort_by_key(|(cid, _)| *cid);

    for chunk in pairs.chunks(100) {
        let _ = writeln!(out, "{} beginbfchar", chunk.len());
        for (cid, text) in chunk {
            let _ = write!(out, "<{cid:04x}> <");
            for unit in text.encode_utf16() {
                let _ = write!(out, "{unit:04x}");
            }
            let _ = writeln!(out, ">");
        }
        out.extend_from_slice(b"endbfchar\n");
    }

    out.extend_from_slice(
        b"endcmap\n\
CMapName currentdict /CMap defineresource pop\n\
end\n\
end\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_cids_to_utf16() {
        let cmap = build_to_unicode(&[(1, "H".to_string()), (2, "€".to_string())]);
        let text = String::from_utf8_lossy(&cmap);
        assert!(text.contains("<0001> <0048>"));
        assert!(text.contains("<0002> <20ac>"));
        assert!(text.contains("begincodespacerange"));
        assert!(text.ends_with("end\nend\n"));
    }
}
