//! Hit detection.
//!
//! Both halves are pure: [`find_hits`] reports which issue letters a shot
//! crosses, and [`score_shot`] turns those hits into points. The world
//! applies the effects (blanking letters, spawning bursts, logging).

use crate::config::PERFECT_ROUND;
use crate::entities::{CommitShot, Issue};
use crate::game::EntityId;
use crate::geometry::{Point, Ray};

/// One issue letter struck by a shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub issue: EntityId,
    /// Column offset of the letter within the issue text.
    pub offset: i32,
    /// Screen cell of the letter.
    pub at: Point,
    pub letter: char,
    /// The shot carried the same character on the issue's row.
    pub exact: bool,
}

/// Points awarded for a single shot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShotOutcome {
    /// Letters destroyed.
    pub hits: u32,
    pub multiplier: u64,
    pub points: u64,
    pub bonus: bool,
}

/// Every issue whose span contains the shot column and whose letter at that
/// column is not blank counts as a hit, in the order given.
///
/// The shot column is the ray's first x; the row used to index the shot is
/// measured from the ray's last y (the bottom of the shot).
pub fn find_hits<'a, I>(issues: I, ray: &Ray, shot: &CommitShot) -> Vec<Hit>
where
    I: IntoIterator<Item = (EntityId, &'a Issue)>,
{
    let (Some(first), Some(last)) = (ray.first(), ray.last()) else {
        return Vec::new();
    };
    let shot_x = first.x;
    let shot_y = last.y;

    issues
        .into_iter()
        .filter(|(_, issue)| issue.spans(shot_x))
        .filter_map(|(id, issue)| {
            let offset = shot_x - issue.obj.x;
            let letter = issue.letter_at(offset)?;
            if letter == ' ' {
                return None;
            }
            let exact = shot.letter_at(shot_y - issue.obj.y) == Some(letter);
            Some(Hit {
                issue: id,
                offset,
                at: Point::new(shot_x, issue.obj.y),
                letter,
                exact,
            })
        })
        .collect()
}

/// Each exact match doubles the multiplier; destroying exactly
/// [`PERFECT_ROUND`] letters doubles it once more. Points are the hit count
/// times the multiplier.
pub fn score_shot(hits: &[Hit]) -> ShotOutcome {
    let count = hits.len() as u32;
    let mut multiplier: u64 = 1;
    for _ in hits.iter().filter(|h| h.exact) {
        multiplier = multiplier.saturating_mul(2);
    }
    if count == PERFECT_ROUND {
        multiplier = multiplier.saturating_mul(2);
    }

    let bonus = multiplier > 1;
    let points = if bonus {
        (count as u64).saturating_mul(multiplier)
    } else {
        count as u64
    };

    ShotOutcome {
        hits: count,
        multiplier,
        points,
        bonus,
    }
}
