//! The classification rubric and verdict parsing.

/// Marker the model is asked to emit for a disqualified post.
pub const CRINGE_MARKER: &str = "POST_IS_CRINGE";

/// Marker the model is asked to emit for an acceptable post.
pub const NOT_CRINGE_MARKER: &str = "POST_IS_NOT_CRINGE";

/// Instruction sent as the `prompt` of every request.
pub const RUBRIC: &str = "\
You are a LinkedIn post analyzer. Determine if a post is cringe based on these criteria:
1. Selling a course with an unrelated emotional story
2. Overly emotional or clickbait stories with no tech content
3. Motivational quotes not tied to tech growth
4. Non-tech political or social commentary
5. Purely personal content without professional context
6. Posts asking to comment, tag or like with no substance
7. Generalized or redundant content
8. Brand promotional content or ads
9. Overly generic advice without specifics
10. Viral memes unrelated to professional goals
11. Written by an AI
12. Overly personal or TMI content
13. Excessive self-promotion or bragging
14. Inappropriate workplace behavior
15. Forced or artificial inspiration
16. Obvious humble bragging
17. Misleading or out-of-context information

If the post matches any of these criteria, answer POST_IS_CRINGE.
Otherwise answer POST_IS_NOT_CRINGE.";

/// Whether model output flags the post.
///
/// Case-insensitive substring test, so surrounding prose is tolerated.
/// `POST_IS_NOT_CRINGE` does not contain the cringe marker.
pub fn verdict_from_output(output: &str) -> bool {
    output
        .to_lowercase()
        .contains(&CRINGE_MARKER.to_lowercase())
}
