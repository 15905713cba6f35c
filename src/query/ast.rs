/// How an atom's body is matched against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// Ordered subsequence match, scored by the fuzzy scorer.
    Fuzzy,
    /// Whole-line equality, or prefix/suffix equality when anchored.
    Exact,
    /// Contiguous byte sequence.
    Phrase,
}

/// An indivisible search term with its modifier flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The body with all syntax markers stripped.
    pub text: String,
    pub kind: AtomKind,
    pub case_sensitive: bool,
    pub anchor_prefix: bool,
    pub anchor_suffix: bool,
    pub negated: bool,
}

impl Atom {
    pub fn new(text: impl Into<String>, kind: AtomKind) -> Self {
        Self {
            text: text.into(),
            kind,
            case_sensitive: false,
            anchor_prefix: false,
            anchor_suffix: false,
            negated: false,
        }
    }
}

/// Operator tree over atoms.
///
/// Negation is normalized onto leaves where possible; `Not` remains only
/// for negated groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    And(Vec<Query>),
    Or(Vec<Query>),
    Not(Box<Query>),
    Leaf(Atom),
}

impl Query {
    /// All atoms in the tree, in query order.
    pub fn leaves(&self) -> Vec<&Atom> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Atom>) {
        match self {
            Query::And(children) | Query::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Query::Not(inner) => inner.collect_leaves(out),
            Query::Leaf(atom) => out.push(atom),
        }
    }
}
