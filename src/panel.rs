use crate::console::Console;
use crate::display::{font_size, line_height, timestamp_label};
use crate::entry::{EntryKind, LogEntry};
use crate::error::CommandError;
use crate::feed::FeedEvent;
use crate::filter::{EntryCategories, FilterState, TextSize, TimestampMode};
use crate::source_link::{parse_build_message, parse_stack_trace, SourceLink};
use egui::{Color32, Key, RichText};

const INPUT_ROW_HEIGHT: f32 = 28.0;
const DETAIL_HEIGHT: f32 = 140.0;

/// Things the panel cannot handle on its own.
#[derive(Debug)]
pub enum PanelAction {
    OpenSource(SourceLink),
    /// Persist these with [`crate::prefs::save`].
    FilterChanged(FilterState),
    /// A handler failed while the console runs with the propagate policy.
    CommandFailed(CommandError),
}

#[derive(Debug, Default)]
pub struct ConsolePanel {
    input: String,
    selected: Option<usize>,
    focus_input: bool,
}

impl ConsolePanel {
    pub fn new() -> Self {
        Self { focus_input: true, ..Self::default() }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, console: &mut Console) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        if console.feed_mut().drain_events().contains(&FeedEvent::Rebuilt) {
            self.selected = None;
        }
        let filter = console.feed().filter();
        let mut next_filter = filter;
        let mut clear = false;

        ui.horizontal(|ui| {
            ui.menu_button("Settings", |ui| settings_menu(ui, &mut next_filter, &mut clear));
            ui.small(format!("{} / {} entries", console.feed().filtered_len(), console.feed().len()));
        });
        ui.separator();

        let entries = console.feed_mut().snapshot();
        let reserved = INPUT_ROW_HEIGHT + if self.selected.is_some() { DETAIL_HEIGHT } else { 0.0 };
        egui::ScrollArea::vertical()
            .id_salt("kestrel_console_entries")
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .max_height((ui.available_height() - reserved).max(INPUT_ROW_HEIGHT))
            .show(ui, |ui| {
                if entries.is_empty() {
                    ui.small("No console output yet.");
                }
                for (index, entry) in entries.iter().enumerate() {
                    let response = entry_row(ui, entry, filter, self.selected == Some(index));
                    if response.clicked() {
                        self.selected = Some(index);
                    }
                    if response.double_clicked() && entry.is_build_time() {
                        if let Some(link) = parse_build_message(entry.message()) {
                            actions.push(PanelAction::OpenSource(link));
                        }
                    }
                    response.context_menu(|ui| settings_menu(ui, &mut next_filter, &mut clear));
                }
            });

        if let Some(entry) = self.selected.and_then(|index| entries.get(index)) {
            ui.separator();
            let mut close = false;
            egui::ScrollArea::vertical().id_salt("kestrel_console_detail").max_height(DETAIL_HEIGHT).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(entry.message()).strong());
                    close = ui.small_button("x").clicked();
                });
                for line in parse_stack_trace(entry.detail()) {
                    ui.horizontal(|ui| {
                        if !line.text.is_empty() {
                            ui.label(RichText::new(&line.text).weak());
                        }
                        if let Some(link) = line.link {
                            if ui.link(format!("(at {link})")).clicked() {
                                actions.push(PanelAction::OpenSource(link));
                            }
                        }
                    });
                }
            });
            if close {
                self.selected = None;
            }
        }

        ui.separator();
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.input).desired_width(f32::INFINITY).hint_text("help"),
        );
        if self.focus_input {
            response.request_focus();
            self.focus_input = false;
        }
        if response.has_focus() {
            let (up, down) = ui.input(|i| (i.key_pressed(Key::ArrowUp), i.key_pressed(Key::ArrowDown)));
            if up {
                if let Some(line) = console.history_mut().previous() {
                    self.input = line.to_string();
                }
            } else if down {
                self.input = console.history_mut().next().map(str::to_string).unwrap_or_default();
            }
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            let line = std::mem::take(&mut self.input);
            if let Err(err) = console.submit(&line) {
                actions.push(PanelAction::CommandFailed(err));
            }
            self.focus_input = true;
        }

        if clear {
            console.clear(true);
            self.selected = None;
        }
        if next_filter != filter {
            console.set_filter(next_filter);
            actions.push(PanelAction::FilterChanged(next_filter));
        }
        actions
    }
}

fn entry_color(kind: EntryKind) -> Color32 {
    match kind {
        EntryKind::Info => Color32::WHITE,
        EntryKind::Warning => Color32::from_rgb(255, 210, 110),
        EntryKind::Error => Color32::from_rgb(255, 120, 120),
        EntryKind::CommandEcho => Color32::from_rgb(130, 200, 255),
        EntryKind::CommandOutput => Color32::LIGHT_GREEN,
    }
}

fn entry_row(ui: &mut egui::Ui, entry: &LogEntry, filter: FilterState, selected: bool) -> egui::Response {
    let size = font_size(filter.text_size);
    ui.horizontal(|ui| {
        ui.set_min_height(line_height(filter.text_size));
        if let Some(label) = timestamp_label(entry, filter.timestamp_mode) {
            ui.label(RichText::new(label.prefix).size(size).weak());
            if !label.emphasis.is_empty() {
                ui.add_space(-ui.spacing().item_spacing.x);
                ui.label(RichText::new(label.emphasis).size(size).strong());
            }
        }
        let mut text = RichText::new(entry.message()).size(size).color(entry_color(entry.kind()));
        if selected {
            text = text.underline();
        }
        ui.add(egui::Label::new(text).sense(egui::Sense::click()).truncate())
    })
    .inner
}

fn settings_menu(ui: &mut egui::Ui, filter: &mut FilterState, clear: &mut bool) {
    if ui.button("Clear").clicked() {
        *clear = true;
    }
    ui.separator();
    for category in
        [EntryCategories::INFO, EntryCategories::WARNING, EntryCategories::ERROR, EntryCategories::COMMANDS]
    {
        let mut shown = filter.shows(category);
        if ui.checkbox(&mut shown, category.label()).changed() {
            filter.set_shown(category, shown);
        }
    }
    ui.separator();
    ui.menu_button("Timestamp", |ui| {
        for mode in TimestampMode::ALL {
            if ui.radio(filter.timestamp_mode == mode, mode.label()).clicked() {
                filter.timestamp_mode = mode;
            }
        }
    });
    ui.menu_button("Text Size", |ui| {
        for size in TextSize::ALL {
            if ui.radio(filter.text_size == size, size.label()).clicked() {
                filter.text_size = size;
            }
        }
    });
}
