//! Box-drawing glyphs
//!
//! Double lines mark nodes that have holders or children, single lines nodes
//! with leaf cases only.

use super::RenderError;

/// Branch marker of an entry: corner followed by the horizontal fill, or `>`
/// when the entry is on the selection path.
pub fn cross(
    is_last: bool,
    thick_vertical: bool,
    thick_horizontal: bool,
    selected: bool,
) -> Result<String, RenderError> {
    if is_last && thick_vertical != thick_horizontal {
        return Err(RenderError::GlyphMismatch {
            is_last,
            thick_vertical,
            thick_horizontal,
        });
    }
    if !thick_vertical && thick_horizontal {
        return Err(RenderError::GlyphMismatch {
            is_last,
            thick_vertical,
            thick_horizontal,
        });
    }

    let corner = match (is_last, thick_vertical, thick_horizontal) {
        (true, true, _) => '╚',
        (true, false, _) => '└',
        (false, true, true) => '╠',
        (false, true, false) => '╟',
        (false, false, _) => '├',
    };
    let fill = if selected {
        '>'
    } else if thick_horizontal {
        '═'
    } else {
        '─'
    };

    Ok([corner, fill].iter().collect())
}

/// Continuation column below an entry
pub fn line(is_last: bool, thick: bool) -> &'static str {
    match (is_last, thick) {
        (true, _) => "  ",
        (false, true) => "║ ",
        (false, false) => "│ ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_glyphs() {
        assert_eq!(cross(false, true, true, false).unwrap(), "╠═");
        assert_eq!(cross(false, true, false, false).unwrap(), "╟─");
        assert_eq!(cross(false, false, false, false).unwrap(), "├─");
        assert_eq!(cross(true, true, true, false).unwrap(), "╚═");
        assert_eq!(cross(true, false, false, false).unwrap(), "└─");
    }

    #[test]
    fn test_selected_fill() {
        assert_eq!(cross(false, true, true, true).unwrap(), "╠>");
        assert_eq!(cross(true, false, false, true).unwrap(), "└>");
    }

    #[test]
    fn test_mismatched_weights() {
        assert!(cross(true, true, false, false).is_err());
        assert!(cross(false, false, true, false).is_err());
        assert!(cross(true, false, true, false).is_err());
    }

    #[test]
    fn test_line() {
        assert_eq!(line(true, true), "  ");
        assert_eq!(line(false, true), "║ ");
        assert_eq!(line(false, false), "│ ");
    }
}
