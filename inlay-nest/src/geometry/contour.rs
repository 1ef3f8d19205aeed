//! SVG path data (`d` attribute) parsing and curve flattening.
//!
//! Path data is parsed by `svgtypes` into absolute [`PathCommand`]s, which are then flattened into
//! [`Contour`]s: one polyline per sub-path. Bézier curves are approximated with line segments
//! using `lyon_geom`, within a given tolerance. Elliptical arcs arrive as cubic curves.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use regex::Regex;
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::geometry::primitives::Point;

/// A single drawing command with absolute coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        ctrl: Point,
        to: Point,
    },
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Close,
}

/// A flattened sub-path.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    /// Whether the sub-path was terminated by a closepath command
    pub closed: bool,
}

static CLOSED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"M[^MZ]*Z").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,]+").expect("valid regex"));

/// A path is considered closed if it contains a moveto followed by a closepath,
/// without another moveto in between.
pub fn is_closed(d: &str) -> bool {
    if d.trim().is_empty() {
        return false;
    }
    let cleaned = SEPARATORS.replace_all(d.trim(), " ").to_uppercase();
    CLOSED_PATTERN.is_match(&cleaned)
}

/// Parses path data into a list of absolute commands.
///
/// Relative, horizontal, vertical and smooth commands are resolved, implicitly repeated argument
/// groups are expanded and elliptical arcs are converted to cubic curves.
pub fn parse_path_data(d: &str) -> Result<Vec<PathCommand>> {
    let p = |x: f64, y: f64| Point(x as f32, y as f32);
    SimplifyingPathParser::from(d)
        .map(|segment| -> Result<PathCommand, svgtypes::Error> {
            let command = match segment? {
                SimplePathSegment::MoveTo { x, y } => PathCommand::MoveTo(p(x, y)),
                SimplePathSegment::LineTo { x, y } => PathCommand::LineTo(p(x, y)),
                SimplePathSegment::Quadratic { x1, y1, x, y } => PathCommand::QuadTo {
                    ctrl: p(x1, y1),
                    to: p(x, y),
                },
                SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => PathCommand::CubicTo {
                    ctrl1: p(x1, y1),
                    ctrl2: p(x2, y2),
                    to: p(x, y),
                },
                SimplePathSegment::ClosePath => PathCommand::Close,
            };
            Ok(command)
        })
        .collect::<Result<Vec<_>, svgtypes::Error>>()
        .with_context(|| format!("invalid path data '{d}'"))
}

/// Flattens absolute path commands into one [`Contour`] per sub-path.
/// Curves and arcs are approximated by line segments deviating at most `tolerance` from the curve.
pub fn flatten(commands: &[PathCommand], tolerance: f32) -> Vec<Contour> {
    let mut contours: Vec<Contour> = vec![];
    let mut current: Option<Point> = None;

    for command in commands {
        let from = match (command, current) {
            (PathCommand::MoveTo(to), _) => {
                contours.push(Contour {
                    points: vec![*to],
                    closed: false,
                });
                current = Some(*to);
                continue;
            }
            (_, None) => {
                //drawing without a preceding moveto starts at the origin
                contours.push(Contour {
                    points: vec![Point(0.0, 0.0)],
                    closed: false,
                });
                Point(0.0, 0.0)
            }
            (PathCommand::Close, Some(from)) => from,
            (_, Some(from)) => {
                if contours.last().is_some_and(|c| c.closed) {
                    //drawing after a closepath starts a new sub-path at the previous start point
                    contours.push(Contour {
                        points: vec![from],
                        closed: false,
                    });
                }
                from
            }
        };
        let contour = contours.last_mut().expect("a contour was started");

        match *command {
            PathCommand::MoveTo(_) => unreachable!(),
            PathCommand::LineTo(to) => {
                contour.points.push(to);
                current = Some(to);
            }
            PathCommand::QuadTo { ctrl, to } => {
                let curve = QuadraticBezierSegment {
                    from: point(from.0, from.1),
                    ctrl: point(ctrl.0, ctrl.1),
                    to: point(to.0, to.1),
                };
                curve.for_each_flattened(tolerance, &mut |segment| {
                    contour.points.push(Point(segment.to.x, segment.to.y));
                });
                current = Some(to);
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let curve = CubicBezierSegment {
                    from: point(from.0, from.1),
                    ctrl1: point(ctrl1.0, ctrl1.1),
                    ctrl2: point(ctrl2.0, ctrl2.1),
                    to: point(to.0, to.1),
                };
                curve.for_each_flattened(tolerance, &mut |segment| {
                    contour.points.push(Point(segment.to.x, segment.to.y));
                });
                current = Some(to);
            }
            PathCommand::Close => {
                contour.closed = true;
                current = contour.points.first().copied();
            }
        }
    }

    contours
}
