use log::{debug, warn};

use crate::types::{BezierSegment, Point};

/// Geometry kind of a subpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubpathKind {
    Lines,
    Bezier,
    Rectangle,
}

/// The live subpath of one kind plus the closed subpaths waiting for paint.
#[derive(Debug, Clone)]
struct KindBuffer<T> {
    live: Vec<T>,
    closed: Vec<Vec<T>>,
    /// Trailing entries of `closed` committed since the last construction
    /// break. A clip takes them back out.
    recent: usize,
}

impl<T> Default for KindBuffer<T> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            closed: Vec::new(),
            recent: 0,
        }
    }
}

impl<T> KindBuffer<T> {
    fn clear(&mut self) {
        self.live.clear();
        self.closed.clear();
        self.recent = 0;
    }

    fn commit(&mut self, subpath: Vec<T>) {
        self.closed.push(subpath);
        self.recent += 1;
    }

    /// Remove the recently committed subpaths. Returns how many were removed.
    fn drop_recent(&mut self) -> usize {
        let keep = self.closed.len().saturating_sub(self.recent);
        let removed = self.closed.len() - keep;
        self.closed.truncate(keep);
        self.recent = 0;
        removed
    }

    /// Hand over what a paint operator consumes: every closed subpath, or
    /// the live one if nothing was closed yet. Both buffers end up empty.
    fn take_for_paint(&mut self) -> Option<(Vec<Vec<T>>, bool)> {
        let closed = std::mem::take(&mut self.closed);
        let live = std::mem::take(&mut self.live);
        if !closed.is_empty() {
            Some((closed, true))
        } else if !live.is_empty() {
            Some((vec![live], false))
        } else {
            None
        }
    }
}

/// Subpaths handed to the painter, grouped by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Subpaths {
    Lines(Vec<Vec<Point>>),
    Bezier(Vec<Vec<BezierSegment>>),
    Rectangle(Vec<Vec<Point>>),
}

/// Everything the painter needs to turn buffered construction into area.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSource {
    pub subpaths: Subpaths,
    /// `true` when the subpaths come from the closed-subpath list, `false`
    /// when the single live subpath was used.
    pub from_path: bool,
    /// Closed flag at paint time. When unset, fills close each ring: path
    /// subpaths on their own first point, the live subpath on the
    /// remembered start point.
    pub closed: bool,
    pub start_point: Option<Point>,
}

/// Path-construction state machine.
///
/// Keeps one buffer per subpath kind. The kind of the most recent
/// construction operator is the one a close or paint operator acts on.
#[derive(Debug, Default)]
pub struct PathBuilder {
    lines: KindBuffer<Point>,
    bezier: KindBuffer<BezierSegment>,
    rectangle: KindBuffer<Point>,
    kind: Option<SubpathKind>,
    start_point: Option<Point>,
    current_point: Option<Point>,
    closed: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<SubpathKind> {
        self.kind
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start_point
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    /// Number of closed subpaths of `kind` awaiting paint.
    pub fn closed_count(&self, kind: SubpathKind) -> usize {
        match kind {
            SubpathKind::Lines => self.lines.closed.len(),
            SubpathKind::Bezier => self.bezier.closed.len(),
            SubpathKind::Rectangle => self.rectangle.closed.len(),
        }
    }

    /// Number of entries (points or Bézier segments) in the live subpath of `kind`.
    pub fn live_len(&self, kind: SubpathKind) -> usize {
        match kind {
            SubpathKind::Lines => self.lines.live.len(),
            SubpathKind::Bezier => self.bezier.live.len(),
            SubpathKind::Rectangle => self.rectangle.live.len(),
        }
    }

    fn clear_live(&mut self) {
        self.lines.live.clear();
        self.bezier.live.clear();
        self.rectangle.live.clear();
    }

    /// Subpaths committed before this point are no longer clip candidates.
    fn settle(&mut self) {
        self.lines.recent = 0;
        self.bezier.recent = 0;
        self.rectangle.recent = 0;
    }

    /// `m`: begin a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.clear_live();
        self.lines.live.push(p);
        self.kind = None;
        self.start_point = Some(p);
        self.current_point = Some(p);
        self.closed = false;
        self.settle();
    }

    /// `l`: straight segment from the current point to `p`.
    pub fn line_to(&mut self, p: Point) {
        if self.lines.live.is_empty() {
            if let Some(current) = self.current_point {
                self.lines.live.push(current);
            }
        }
        self.lines.live.push(p);
        self.kind = Some(SubpathKind::Lines);
        self.current_point = Some(p);
        self.settle();
    }

    /// `c`, and `v`/`y` once their implied control point is filled in.
    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        let Some(start) = self.current_point else {
            warn!("PDF: Bézier segment without a current point, ignored");
            return;
        };
        self.bezier.live.push([start, c1, c2, end]);
        self.kind = Some(SubpathKind::Bezier);
        self.current_point = Some(end);
        self.settle();
    }

    /// `v`: the first control point coincides with the current point.
    pub fn curve_v(&mut self, c2: Point, end: Point) {
        if let Some(start) = self.current_point {
            self.curve_to(start, c2, end);
        } else {
            warn!("PDF: Bézier segment without a current point, ignored");
        }
    }

    /// `y`: the second control point coincides with the end point.
    pub fn curve_y(&mut self, c1: Point, end: Point) {
        self.curve_to(c1, end, end);
    }

    /// `re`: a complete closed rectangle with corner `origin` and signed
    /// `size`, committed to the path in one step.
    pub fn rectangle(&mut self, origin: Point, size: [f64; 2]) {
        let [x, y] = origin;
        let [w, h] = size;
        let p1 = [x, y];
        self.lines.recent = 0;
        self.bezier.recent = 0;
        self.rectangle
            .commit(vec![p1, [x + w, y], [x + w, y + h], [x, y + h], p1]);
        self.kind = Some(SubpathKind::Rectangle);
        self.start_point = Some(p1);
        self.current_point = Some(p1);
        self.closed = true;
    }

    /// `h`: close the live subpath of the current kind and move it to the
    /// path's closed list.
    pub fn close(&mut self) {
        self.closed = true;
        match self.kind {
            Some(SubpathKind::Lines) if self.lines.live.len() >= 2 => {
                if let Some(start) = self.start_point {
                    self.lines.live.push(start);
                }
                let subpath = std::mem::take(&mut self.lines.live);
                self.settle();
                self.lines.commit(subpath);
            }
            Some(SubpathKind::Bezier) if !self.bezier.live.is_empty() => {
                let subpath = std::mem::take(&mut self.bezier.live);
                self.settle();
                self.bezier.commit(subpath);
            }
            // Rectangles are committed closed by `re` and stay clip candidates
            Some(SubpathKind::Rectangle) => {}
            _ => self.settle(),
        }
        if self.start_point.is_some() {
            self.current_point = self.start_point;
        }
    }

    /// `W n`: drop the live subpaths and take every subpath committed
    /// since the last construction break back out of the path.
    pub fn clip(&mut self) {
        self.clear_live();
        let removed =
            self.lines.drop_recent() + self.bezier.drop_recent() + self.rectangle.drop_recent();
        if removed > 0 {
            debug!("PDF: discarded {removed} clipping subpath(s)");
        }
        self.closed = false;
    }

    /// `n`: end the path without painting it.
    pub fn discard(&mut self) {
        self.lines.clear();
        self.bezier.clear();
        self.rectangle.clear();
    }

    /// Consume the buffers of the current kind for a paint operator.
    ///
    /// Returns `None` when nothing of that kind was constructed. Afterwards
    /// the path counts as closed, so a further close operator is harmless.
    pub fn take_for_paint(&mut self) -> Option<PaintSource> {
        let closed = self.closed;
        self.closed = true;
        self.settle();

        let (subpaths, from_path) = match self.kind? {
            SubpathKind::Lines => {
                let (subpaths, from_path) = self.lines.take_for_paint()?;
                (Subpaths::Lines(subpaths), from_path)
            }
            SubpathKind::Bezier => {
                let (subpaths, from_path) = self.bezier.take_for_paint()?;
                (Subpaths::Bezier(subpaths), from_path)
            }
            SubpathKind::Rectangle => {
                let (subpaths, from_path) = self.rectangle.take_for_paint()?;
                (Subpaths::Rectangle(subpaths), from_path)
            }
        };

        Some(PaintSource {
            subpaths,
            from_path,
            closed,
            start_point: self.start_point,
        })
    }
}
