use std::io::{BufRead, Write};

use colored::Colorize;

use crate::error::Result;
use crate::rating::{RatedTrack, TrackRating};

/// Ask for a rating per track on `output`, reading answers from `input`.
///
/// An empty answer keeps the track's current rating. Invalid answers are
/// reported and asked again. If input ends early, the remaining tracks keep
/// their current ratings.
pub fn prompt_ratings<R: BufRead, W: Write>(
    tracks: &[RatedTrack],
    mut input: R,
    mut output: W,
) -> Result<Vec<TrackRating>> {
    writeln!(
        output,
        "{}",
        "Rate each song 0-10 (add !best or !worst to flag it, or type 'skit'):".cyan()
    )?;

    let mut ratings = Vec::with_capacity(tracks.len());
    let mut exhausted = false;

    for (i, track) in tracks.iter().enumerate() {
        loop {
            if exhausted {
                ratings.push(track.rating);
                break;
            }

            write!(output, "{:2}. {} [{}]: ", i + 1, track.name, track.rating.score)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                exhausted = true;
                continue;
            }

            let answer = line.trim();
            if answer.is_empty() {
                ratings.push(track.rating);
                break;
            }

            match answer.parse::<TrackRating>() {
                Ok(rating) => {
                    ratings.push(rating);
                    break;
                }
                Err(e) => writeln!(output, "   {}", e.to_string().red())?,
            }
        }
    }

    Ok(ratings)
}
