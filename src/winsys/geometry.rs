use std::fmt;

#[derive(Debug, Default, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn values(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Pixel extent of a window. Never negative.
#[derive(Debug, Default, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: u32,
    pub h: u32,
}

impl Dim {
    pub fn values(&self) -> (u32, u32) {
        (self.w, self.h)
    }
}

#[derive(Debug, Default, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Region {
    pub const fn new(
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    pub fn values(&self) -> (Pos, Dim) {
        (self.pos, self.dim)
    }

    /// Shrinks the region by `amount` pixels on every side. Extents never
    /// drop below a single pixel.
    pub fn inset(
        self,
        amount: u32,
    ) -> Self {
        let amount_i32 = i32::try_from(amount).unwrap_or(i32::MAX);

        Self {
            pos: Pos {
                x: self.pos.x.saturating_add(amount_i32),
                y: self.pos.y.saturating_add(amount_i32),
            },
            dim: Dim {
                w: self.dim.w.saturating_sub(amount.saturating_mul(2)).max(1),
                h: self.dim.h.saturating_sub(amount.saturating_mul(2)).max(1),
            },
        }
    }

    /// Removes room for a border of `border_width` pixels around the region,
    /// keeping its position. The X server draws borders outside a window's
    /// extent, so this is what makes a decorated window fit the region.
    pub fn without_border(
        self,
        border_width: u32,
    ) -> Self {
        Self {
            pos: self.pos,
            dim: Dim {
                w: self.dim.w.saturating_sub(border_width.saturating_mul(2)).max(1),
                h: self.dim.h.saturating_sub(border_width.saturating_mul(2)).max(1),
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.dim.w, self.dim.h, self.pos.x, self.pos.y
        )
    }
}
