use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::input::{InputEvent, Key};

/// Numeric control bound to a shared value.
pub struct Binding {
    pub label: String,
    value: Rc<Cell<f32>>,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Binding {
    pub fn get(&self) -> f32 {
        self.value.get()
    }

    /// Stores `v` clamped to `[min, max]` and returns what was stored.
    pub fn set(&self, v: f32) -> f32 {
        let v = v.clamp(self.min, self.max);
        self.value.set(v);
        v
    }

    pub fn nudge(&self, steps: i32) -> f32 {
        self.set(self.get() + self.step * steps as f32)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({} = {} in {}..={})", self.label, self.get(), self.min, self.max)
    }
}

pub struct Button {
    pub title: String,
    on_click: Box<dyn FnMut()>,
}

impl Button {
    pub fn click(&mut self) {
        (self.on_click)();
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Button({})", self.title)
    }
}

#[derive(Debug)]
pub struct Folder {
    pub title: String,
    bindings: Vec<Binding>,
    buttons: Vec<Button>,
}

impl Folder {
    pub fn add_binding(
        &mut self,
        label: impl Into<String>,
        value: Rc<Cell<f32>>,
        min: f32,
        max: f32,
        step: f32,
    ) -> &mut Self {
        let binding = Binding { label: label.into(), value, min, max, step };
        // Out-of-range starting values are pulled into range once.
        binding.set(binding.get());
        self.bindings.push(binding);
        self
    }

    pub fn add_button(&mut self, title: impl Into<String>, on_click: impl FnMut() + 'static) -> &mut Self {
        self.buttons.push(Button { title: title.into(), on_click: Box::new(on_click) });
        self
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

/// Folders of bindings and buttons, driven from the keyboard.
///
/// Keys: `1`-`9` click buttons in panel order, `Tab` cycles the selected
/// binding, arrow up/down step it.
#[derive(Debug, Default)]
pub struct DebugPanel {
    active: bool,
    folders: Vec<Folder>,
    /// (folder, binding) of the selected binding.
    selected: Option<(usize, usize)>,
}

impl DebugPanel {
    pub fn new(active: bool) -> Self {
        Self { active, ..Self::default() }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// New folder, or `None` when the panel is inactive.
    pub fn add_folder(&mut self, title: impl Into<String>) -> Option<&mut Folder> {
        if !self.active {
            return None;
        }
        self.folders.push(Folder { title: title.into(), bindings: Vec::new(), buttons: Vec::new() });
        self.folders.last_mut()
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Clicks the `index`-th button counted across folders.
    pub fn press(&mut self, index: usize) -> bool {
        let Some(button) = self.folders.iter_mut().flat_map(|f| f.buttons.iter_mut()).nth(index) else {
            return false;
        };
        log::debug!("debug button `{}` pressed", button.title);
        button.click();
        true
    }

    /// Moves the selection to the next binding, wrapping around.
    pub fn select_next_binding(&mut self) -> Option<&Binding> {
        let all: Vec<(usize, usize)> = self
            .folders
            .iter()
            .enumerate()
            .flat_map(|(fi, f)| (0..f.bindings.len()).map(move |bi| (fi, bi)))
            .collect();

        let next = match self.selected.and_then(|s| all.iter().position(|p| *p == s)) {
            Some(i) => all.get((i + 1) % all.len()).copied(),
            None => all.first().copied(),
        };
        self.selected = next;
        self.selected_binding()
    }

    pub fn selected_binding(&self) -> Option<&Binding> {
        let (fi, bi) = self.selected?;
        self.folders.get(fi)?.bindings.get(bi)
    }

    /// Steps the selected binding; selects the first one if none is.
    pub fn nudge(&mut self, steps: i32) -> Option<f32> {
        if self.selected.is_none() {
            self.select_next_binding();
        }
        let binding = self.selected_binding()?;
        let v = binding.nudge(steps);
        log::debug!("{} = {v}", binding.label);
        Some(v)
    }

    /// Keyboard shortcuts. Returns true when the event was used.
    pub fn handle_input(&mut self, ev: &InputEvent) -> bool {
        if !self.active {
            return false;
        }
        let Some(key) = ev.key_pressed() else {
            return false;
        };

        match key {
            Key::Tab => self.select_next_binding().is_some(),
            Key::ArrowUp => self.nudge(1).is_some(),
            Key::ArrowDown => self.nudge(-1).is_some(),
            other => match other.digit() {
                Some(d) if d > 0 => self.press(d as usize - 1),
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyState, Modifiers};

    fn key(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, modifiers: Modifiers::default(), repeat: false }
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn inactive_panel_builds_nothing() {
        let mut panel = DebugPanel::new(false);
        assert!(panel.add_folder("Renderer").is_none());
        assert!(panel.folders().is_empty());
        assert!(!panel.handle_input(&key(Key::Digit1)));
    }

    // ── bindings ──────────────────────────────────────────────────────────

    #[test]
    fn binding_writes_through_and_clamps() {
        let exposure = Rc::new(Cell::new(1.2));
        let mut panel = DebugPanel::new(true);
        panel.add_folder("Renderer").unwrap().add_binding("exposure", Rc::clone(&exposure), 1.0, 5.0, 0.5);

        let v = panel.nudge(2).unwrap();
        assert!((v - 2.2).abs() < 1e-6);
        assert_eq!(exposure.get(), v);

        panel.nudge(100);
        assert_eq!(exposure.get(), 5.0);
        panel.nudge(-100);
        assert_eq!(exposure.get(), 1.0);
    }

    #[test]
    fn initial_value_is_clamped() {
        let v = Rc::new(Cell::new(9.0));
        let mut panel = DebugPanel::new(true);
        panel.add_folder("f").unwrap().add_binding("v", Rc::clone(&v), 0.0, 1.0, 0.1);
        assert_eq!(v.get(), 1.0);
    }

    #[test]
    fn tab_cycles_across_folders() {
        let mut panel = DebugPanel::new(true);
        panel.add_folder("a").unwrap().add_binding("x", Rc::new(Cell::new(0.0)), 0.0, 1.0, 0.1);
        panel.add_folder("b").unwrap().add_binding("y", Rc::new(Cell::new(0.0)), 0.0, 1.0, 0.1);

        assert!(panel.handle_input(&key(Key::Tab)));
        assert_eq!(panel.selected_binding().unwrap().label, "x");
        panel.handle_input(&key(Key::Tab));
        assert_eq!(panel.selected_binding().unwrap().label, "y");
        panel.handle_input(&key(Key::Tab));
        assert_eq!(panel.selected_binding().unwrap().label, "x");
    }

    // ── buttons ───────────────────────────────────────────────────────────

    #[test]
    fn digits_click_buttons_in_panel_order() {
        let clicked = Rc::new(Cell::new(None));
        let mut panel = DebugPanel::new(true);
        {
            let folder = panel.add_folder("Fox").unwrap();
            for i in 0..2 {
                let c = Rc::clone(&clicked);
                folder.add_button(format!("Animation {}", i + 1), move || c.set(Some(i)));
            }
        }

        assert!(panel.handle_input(&key(Key::Digit2)));
        assert_eq!(clicked.get(), Some(1));
        assert!(panel.handle_input(&key(Key::Digit1)));
        assert_eq!(clicked.get(), Some(0));

        assert!(!panel.handle_input(&key(Key::Digit9)));
        assert!(!panel.handle_input(&key(Key::Digit0)));
    }
}
