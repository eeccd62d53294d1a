//! Box and edge glyphs for the preview canvas
//!
//! Every glyph set exists in an ASCII and a Unicode flavour.

use super::CharacterSet;

/// Characters used to outline a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BoxChars {
    /// Plain rectangle for leaf nodes
    pub fn rectangle(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
        }
    }

    /// Rounded corners for circular nodes
    pub fn rounded(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                top_left: '(',
                top_right: ')',
                bottom_left: '(',
                bottom_right: ')',
                ..Self::ascii()
            },
            CharacterSet::Unicode => Self {
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
                horizontal: '─',
                vertical: '│',
            },
        }
    }

    /// Double-line box for containers, visually distinct from leaves
    pub fn double(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                top_left: '#',
                top_right: '#',
                bottom_left: '#',
                bottom_right: '#',
                horizontal: '=',
                vertical: '#',
            },
            CharacterSet::Unicode => Self {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
        }
    }

    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }
}

/// Characters used to trace edges between node centres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeChars {
    /// Forward (layered) edge
    pub edge: char,
    /// Edge cut during layering to break a cycle
    pub cut_edge: char,
}

impl EdgeChars {
    pub fn for_style(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                edge: '.',
                cut_edge: '~',
            },
            CharacterSet::Unicode => Self {
                edge: '·',
                cut_edge: '∙',
            },
        }
    }
}
