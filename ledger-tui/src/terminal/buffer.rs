use trestle::element::{Rgb, Style};

pub const DEFAULT_FG: Rgb = Rgb::hex(0xD8DEE9);
pub const DEFAULT_BG: Rgb = Rgb::hex(0x10121A);

/// Text attributes of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attrs {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Attrs {
    /// Combine with the flags set on an element style.
    pub fn with(self, style: &Style) -> Self {
        Self {
            bold: self.bold || style.bold,
            dim: self.dim || style.dim,
            italic: self.italic || style.italic,
            underline: self.underline || style.underline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub attrs: Attrs,
    /// Second column of a wide character.
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            attrs: Attrs::default(),
            wide_continuation: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|idx| &mut self.cells[idx])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    /// Cells that differ from `other`, with their positions.
    pub fn diff<'a>(&'a self, other: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % self.width as usize) as u16;
                let y = (i / self.width as usize) as u16;
                (x, y, cell)
            })
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Row `y` as a string, skipping wide-character continuation cells.
    #[cfg(test)]
    pub fn line(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| !cell.wide_continuation)
            .map(|cell| cell.char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut buffer = Buffer::new(3, 2);
        buffer.set(5, 0, Cell { char: 'x', ..Cell::default() });

        assert!(buffer.get(5, 0).is_none());
        assert_eq!(buffer.line(0), "   ");
    }

    #[test]
    fn diff_reports_changed_cells() {
        let previous = Buffer::new(4, 2);
        let mut current = Buffer::new(4, 2);
        current.set(2, 1, Cell { char: 'a', ..Cell::default() });

        let changed: Vec<_> = current.diff(&previous).map(|(x, y, c)| (x, y, c.char)).collect();

        assert_eq!(changed, vec![(2, 1, 'a')]);
    }
}
