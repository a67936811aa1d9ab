use crate::animator::Animator;
use crate::cli::Args;
use crate::clock::FrameClock;
use crate::geometry::{Rgb, CELL_COUNT};
use crate::graphics::Framebuffer;
use crate::moves::SCRAMBLE_LEN;
use crate::scene::{Orbit, Scene};
use crate::state::ViewState;
use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use glam::Vec2;
use std::io::{self, Write};

/// What the frame loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Terminal host for the cube: owns the scene, the animator and one
/// framebuffer pixel pair per character cell.
pub struct CubeWidget {
    animator: Animator,
    scene: Scene,
    framebuffer: Framebuffer,
    state: ViewState,
    clock: FrameClock,
    /// Is the user currently dragging to orbit?
    dragging: bool,
    /// Last mouse position, in framebuffer pixels
    last_mouse_pos: Vec2,
}

impl CubeWidget {
    pub fn new(state: ViewState, target_fps: u32, cols: u16, rows: u16) -> Self {
        CubeWidget {
            animator: Animator::new(),
            scene: Scene::default(),
            framebuffer: framebuffer_for(cols, rows),
            state,
            clock: FrameClock::new(target_fps),
            dragging: false,
            last_mouse_pos: Vec2::ZERO,
        }
    }

    /// Rebuilds the framebuffer for a new terminal size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("terminal resized to {cols}x{rows}");
        self.framebuffer = framebuffer_for(cols, rows);
    }

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: &Event) -> Control {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => return self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => self.resize(*cols, *rows),
            _ => {}
        }
        Control::Continue
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.state.debug = !self.state.debug,
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.state.paused = !self.state.paused;
                // Drop any drag in progress
                self.dragging = false;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if !self.state.paused {
                    self.scene.orbit = Orbit::default();
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if !self.state.orbit_enabled || self.state.paused {
            return;
        }
        let pos = Vec2::new(mouse.column as f32, mouse.row as f32 * 2.0);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragging = true;
                self.last_mouse_pos = pos;
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                let delta = pos - self.last_mouse_pos;
                self.scene.orbit.drag(delta, self.framebuffer.height() as f32);
                self.last_mouse_pos = pos;
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = false,
            _ => {}
        }
    }

    /// Advances the clock and, unless paused, the animation.
    ///
    /// Returns the index of the frame just started.
    pub fn tick(&mut self) -> u64 {
        let time = self.clock.tick();
        if !self.state.paused {
            self.animator.update(time.delta);
        }
        time.frame_count
    }

    /// Time to wait before the next frame is due
    pub fn frame_remaining(&self) -> std::time::Duration {
        self.clock.remaining()
    }

    /// Text shown by the debug overlay
    pub fn overlay_lines(&self) -> Vec<String> {
        let anim = self.animator.state();
        let orbit = &self.scene.orbit;
        let mut lines = vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.clock.fps()),
            format!("Phase: {}", anim.phase.name()),
            format!("Cells home: {}/{}", self.animator.cells_home(), CELL_COUNT),
        ];
        if !anim.phase.is_paused() {
            lines.push(format!(
                "Move: {}/{} progress {:.2}",
                (anim.move_index + 1).min(SCRAMBLE_LEN),
                SCRAMBLE_LEN,
                anim.eased_progress
            ));
        }
        if self.state.orbit_enabled {
            lines.push(format!("Orbit: yaw {:.2}, pitch {:.2}", orbit.yaw, orbit.pitch));
        } else {
            lines.push("Orbit: off".to_string());
        }
        lines
    }

    /// Paint the cube into the terminal
    pub fn paint(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.scene.render(&self.animator, &mut self.framebuffer);
        if self.state.debug {
            self.scene.render_axes(&self.animator, &mut self.framebuffer);
        }

        let cols = self.framebuffer.width();
        let rows = self.framebuffer.height() / 2;
        let mut colors = None;
        for row in 0..rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..cols {
                let top = self.framebuffer.pixel(col, row * 2);
                let bottom = self.framebuffer.pixel(col, row * 2 + 1);
                let (glyph, fg, bg) = half_block(top, bottom);
                if colors != Some((fg, bg)) {
                    queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg))?;
                    colors = Some((fg, bg));
                }
                queue!(out, Print(glyph))?;
            }
        }
        queue!(out, ResetColor)?;

        if self.state.debug {
            for (i, line) in self.overlay_lines().into_iter().enumerate() {
                queue!(out, cursor::MoveTo(1, i as u16), Print(line))?;
            }
        }

        // Display 'Paused' if the simulation is paused
        if self.state.paused {
            let text = "Paused";
            let x = cols.saturating_sub(text.len()) / 2;
            queue!(out, cursor::MoveTo(x as u16, (rows / 2) as u16), Print(text))?;
        }

        out.flush()
    }
}

fn framebuffer_for(cols: u16, rows: u16) -> Framebuffer {
    Framebuffer::new(cols as usize, rows as usize * 2)
}

fn term_color(color: Option<Rgb>) -> Color {
    match color {
        Some([r, g, b]) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

/// Glyph and colours for a character cell showing two stacked pixels.
///
/// Empty pixels keep the terminal's own background.
fn half_block(top: Option<Rgb>, bottom: Option<Rgb>) -> (char, Color, Color) {
    match (top, bottom) {
        (None, None) => (' ', Color::Reset, Color::Reset),
        (Some(_), None) => ('▀', term_color(top), Color::Reset),
        (None, Some(_)) => ('▄', term_color(bottom), Color::Reset),
        (Some(_), Some(_)) => ('▀', term_color(top), term_color(bottom)),
    }
}

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard {
    mouse_capture: bool,
}

impl TerminalGuard {
    fn enter(out: &mut io::Stdout, mouse_capture: bool) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard { mouse_capture };
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;
        if mouse_capture {
            execute!(out, event::EnableMouseCapture).context("failed to enable mouse capture")?;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_capture {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn terminal_size() -> anyhow::Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => terminal::size().context("failed to query terminal size"),
    }
}

/// Runs the frame loop until the user quits or the frame limit is reached
pub fn run(args: &Args, orbit_enabled: bool) -> anyhow::Result<()> {
    let (cols, rows) = terminal_size()?;
    log::info!("starting at {cols}x{rows}, {} fps, orbit {orbit_enabled}", args.fps);

    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout, orbit_enabled)?;
    let mut widget = CubeWidget::new(ViewState::new(args.debug, orbit_enabled), args.fps, cols, rows);

    loop {
        while event::poll(std::time::Duration::ZERO).context("failed to poll terminal events")? {
            let event = event::read().context("failed to read terminal event")?;
            if widget.handle_event(&event) == Control::Quit {
                return Ok(());
            }
        }

        let frame = widget.tick();
        if args.frames.is_some_and(|limit| frame >= limit) {
            log::info!("frame limit reached");
            return Ok(());
        }
        widget.paint(&mut stdout).context("failed to draw frame")?;

        // Sleep out the frame, waking early for input
        event::poll(widget.frame_remaining()).context("failed to poll terminal events")?;
    }
}
