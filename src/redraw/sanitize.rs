use tracing::debug;

use crate::{
    config::RedrawConfig,
    geom::line,
    redraw::TrimmedSidewalk,
    types::Sidewalk,
};

/// Turn trimmed sidewalks back into simple polylines.
///
/// A multi-part sidewalk keeps every part longer than `multipart_min_length`,
/// or only its longest part when none is. Anything `min_length` or shorter is
/// dropped afterwards. Input order is preserved, parts in their original order.
pub fn sanitize(trimmed: Vec<TrimmedSidewalk>, config: &RedrawConfig) -> Vec<Sidewalk> {
    let before = trimmed.len();
    let sidewalks = trimmed.into_iter()
        .flat_map(|TrimmedSidewalk { geometry, attrs }| {
            let mut parts = geometry.0.into_iter()
                .map(|part| (line::length(&part), part))
                .collect::<Vec<_>>();

            if parts.len() > 1 {
                if parts.iter().any(|(len, _)| *len > config.multipart_min_length) {
                    parts.retain(|(len, _)| *len > config.multipart_min_length);
                } else {
                    // First of equally long parts wins.
                    let longest = parts.iter().enumerate()
                        .fold(0, |best, (i, (len, _))| if *len > parts[best].0 { i } else { best });
                    parts = vec![parts.swap_remove(longest)];
                }
            }

            parts.into_iter()
                .filter(|(len, _)| *len > config.min_length)
                .map(move |(_, part)| Sidewalk::new(part, attrs.clone()))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    debug!(before, after = sidewalks.len(), "sanitized sidewalk fragments");
    sidewalks
}
