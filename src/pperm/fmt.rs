use std::fmt;

use smallvec::SmallVec;

use crate::point::Point;

use super::PartPerm;

/// Writes a partial permutation as disjoint chains `[a,b,c]` and cycles `(a,b)`.
///
/// A chain starts at a point of the domain that is not in the range and ends at a point of the
/// range that is not in the domain. Chains are written before cycles, each group in the order of
/// their smallest domain point. Fixed points are written as singleton cycles.
pub fn debug_pperm<Pt: Point>(perm: &PartPerm<Pt>, f: &mut impl fmt::Write) -> fmt::Result {
    if perm.is_empty() {
        return write!(f, "<empty partial perm>");
    }

    let (dom, ran) = (perm.dom(), perm.ran());

    let mut sorted_ran = SmallVec::<[Pt; 256]>::from_slice(ran); // TUNE
    sorted_ran.sort_unstable();

    // indexed by position in the domain
    let mut seen = SmallVec::<[bool; 256]>::from_elem(false, dom.len()); // TUNE

    for &a in dom {
        if sorted_ran.binary_search(&a).is_ok() {
            continue;
        }

        write!(f, "[{a}")?;
        let mut b = a;
        while let Ok(pos) = dom.binary_search(&b) {
            seen[pos] = true;
            b = ran[pos];
            write!(f, ",{b}")?;
        }
        write!(f, "]")?;
    }

    for (start, &a) in dom.iter().enumerate() {
        if seen[start] {
            continue;
        }
        seen[start] = true;

        write!(f, "({a}")?;
        let mut b = ran[start];
        while b != a {
            let Ok(pos) = dom.binary_search(&b) else {
                break;
            };
            seen[pos] = true;
            write!(f, ",{b}")?;
            b = ran[pos];
        }
        write!(f, ")")?;
    }

    Ok(())
}

impl<Pt: Point> fmt::Debug for PartPerm<Pt> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_pperm(self, f)
    }
}
