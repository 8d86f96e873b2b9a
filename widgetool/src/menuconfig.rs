//! Interactive terminal editor.
//!
//! The left pane lists the form sections of the active widget. Picking a
//! section opens its controls; every edit goes through the session, so the
//! authoritative config changes at once while the preview pane follows the
//! debounced view on the next refresh tick.
//!
//! Keys: `e` exports the document, `l` shows the share link, `q` quits.

use std::path::PathBuf;

use cursive::{
    Cursive, CursiveExt,
    event::{Event, Key},
    traits::{Nameable, Resizable, Scrollable},
    views::{Dialog, EditView, LinearLayout, Panel, SelectView, TextView},
};
use serde_json::Value;
use url::Url;
use widgetkit::{
    AuthoringSession, PreviewEnv,
    form::{ButtonOp, Control, ControlKind, Direction, FormEvent},
};

const PREVIEW: &str = "preview";
const STATUS: &str = "status";

/// State kept in the cursive user data while editing.
struct Editor {
    session: AuthoringSession,
    base_url: Url,
    output: PathBuf,
    env: PreviewEnv,
    exported: Option<PathBuf>,
}

/// What the editing session produced.
pub struct EditOutcome {
    pub session: AuthoringSession,
    /// Set when the document was exported at least once.
    pub exported: Option<PathBuf>,
}

/// Run the editor until the user quits.
pub fn run(
    session: AuthoringSession,
    base_url: Url,
    output: PathBuf,
) -> anyhow::Result<EditOutcome> {
    let title = format!(
        "{} ({})",
        session.store().widget().label,
        session.store().widget().id
    );
    let form = session.form()?;

    #[cfg(feature = "ui-log")]
    {
        cursive::logger::init();
        cursive::logger::set_filter_levels_from_env();
    }
    let mut siv = Cursive::default();
    siv.set_user_data(Editor {
        session,
        base_url,
        output,
        env: PreviewEnv::default(),
        exported: None,
    });

    let mut sections = SelectView::<String>::new().on_submit(|s, key: &String| show_section(s, key));
    for section in &form.sections {
        sections.add_item(section.title.clone(), section.key.clone());
    }

    let body = LinearLayout::horizontal()
        .child(Panel::new(sections.scrollable()).title("Sections").min_width(24))
        .child(
            Panel::new(TextView::new("").with_name(PREVIEW).scrollable())
                .title("Preview")
                .full_width(),
        );
    let root = LinearLayout::vertical()
        .child(body.full_height())
        .child(TextView::new("e: export  l: link  d: toggle dark  q: quit").with_name(STATUS));

    siv.add_fullscreen_layer(Panel::new(root).title(title));
    siv.add_global_callback('q', Cursive::quit);
    siv.add_global_callback('Q', Cursive::quit);
    siv.add_global_callback('e', export);
    siv.add_global_callback('l', show_link);
    siv.add_global_callback('d', toggle_dark);
    siv.add_global_callback(Key::Esc, |s| {
        if s.screen().len() > 1 {
            s.pop_layer();
        }
    });
    siv.add_global_callback(Event::Refresh, on_refresh);
    siv.set_autorefresh(true);

    refresh_preview(&mut siv);
    siv.run();

    let editor = siv
        .take_user_data::<Editor>()
        .ok_or_else(|| anyhow!("editor state lost"))?;
    Ok(EditOutcome {
        session: editor.session,
        exported: editor.exported,
    })
}

fn status(s: &mut Cursive, text: impl Into<String>) {
    let text = text.into();
    s.call_on_name(STATUS, |v: &mut TextView| v.set_content(text));
}

fn on_refresh(s: &mut Cursive) {
    let settled = s
        .with_user_data(|e: &mut Editor| e.session.poll())
        .unwrap_or(false);
    if settled {
        refresh_preview(s);
    }
}

fn refresh_preview(s: &mut Cursive) {
    let Some(text) = s.with_user_data(|e: &mut Editor| {
        let preview = e.session.preview(e.env);
        let config = serde_json::to_string_pretty(e.session.store().preview())
            .unwrap_or_default();
        format!(
            "widget:     {}\nbackground: {}\ntext:       {}\nfont:       {}\nmode:       {}\n\n{config}",
            preview.widget,
            preview.theme.background,
            preview.theme.text,
            preview.font_family,
            if e.env.system_prefers_dark { "dark" } else { "light" },
        )
    }) else {
        return;
    };
    s.call_on_name(PREVIEW, |v: &mut TextView| v.set_content(text));
}

fn toggle_dark(s: &mut Cursive) {
    s.with_user_data(|e: &mut Editor| e.env.system_prefers_dark = !e.env.system_prefers_dark);
    refresh_preview(s);
}

fn export(s: &mut Cursive) {
    let Some((path, html)) = s.with_user_data(|e: &mut Editor| {
        (e.output.clone(), e.session.export().to_string())
    }) else {
        return;
    };
    match std::fs::write(&path, html) {
        Ok(()) => {
            info!("exported {}", path.display());
            s.with_user_data(|e: &mut Editor| e.exported = Some(path.clone()));
            status(s, format!("exported {}", path.display()));
        }
        Err(e) => {
            s.add_layer(Dialog::info(format!(
                "failed to write {}: {e}",
                path.display()
            )));
        }
    }
}

fn show_link(s: &mut Cursive) {
    let Some(link) = s.with_user_data(|e: &mut Editor| e.session.share_link(&e.base_url)) else {
        return;
    };
    s.add_layer(
        Dialog::around(TextView::new(link.to_string()))
            .title("Share link")
            .button("Close", |s| {
                s.pop_layer();
            }),
    );
}

/// Apply one event and reopen `section` so it shows fresh values.
fn apply(s: &mut Cursive, section: &str, path: &str, event: FormEvent) {
    let result = s.with_user_data(|e: &mut Editor| e.session.edit(path, event));
    match result {
        Some(Ok(true)) => status(s, format!("{path} updated")),
        Some(Ok(false)) => status(s, format!("{path} unchanged")),
        Some(Err(e)) => {
            warn!("{e}");
            status(s, e.to_string());
        }
        None => {}
    }
    s.pop_layer();
    show_section(s, section);
}

fn show_section(s: &mut Cursive, key: &str) {
    let Some(form) = s.with_user_data(|e: &mut Editor| e.session.form()) else {
        return;
    };
    let form = match form {
        Ok(form) => form,
        Err(e) => {
            s.add_layer(Dialog::info(e.to_string()));
            return;
        }
    };
    let Some(section) = form.sections.into_iter().find(|sec| sec.key == key) else {
        return;
    };

    let key = key.to_string();
    let mut list = SelectView::<Control>::new();
    for control in section.controls {
        list.add_item(format!("{}: {}", control.label, summary(&control)), control);
    }
    let list = list.on_submit(move |s, control: &Control| open_control(s, &key, control));

    s.add_layer(
        Dialog::around(list.scrollable())
            .title(section.title)
            .button("Back", |s| {
                s.pop_layer();
            }),
    );
}

fn summary(control: &Control) -> String {
    let text = match &control.kind {
        ControlKind::Toggle { value } => (if *value { "on" } else { "off" }).to_string(),
        ControlKind::Select { value, options } => options
            .iter()
            .find(|o| &o.value == value)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| value.clone()),
        ControlKind::Color { text, .. } => text.clone(),
        ControlKind::Number { value, .. } => {
            value.map(|n| n.to_string()).unwrap_or_default()
        }
        ControlKind::Text { value, .. } => value.lines().next().unwrap_or_default().to_string(),
        ControlKind::CheckboxList { options } => options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        ControlKind::BarList { bars } => format!(
            "{} of {} shown",
            bars.iter().filter(|b| b.enabled).count(),
            bars.len()
        ),
        ControlKind::ButtonManager { buttons, .. } => format!("{} button(s)", buttons.len()),
        ControlKind::Group { entries } => format!("{} value(s)", entries.len()),
    };
    if control.locked {
        format!("{text} [locked]")
    } else {
        text
    }
}

fn open_control(s: &mut Cursive, section: &str, control: &Control) {
    if control.locked {
        s.add_layer(Dialog::info(format!("{} is locked", control.label)));
        return;
    }
    let section = section.to_string();
    let path = control.path.clone();
    match &control.kind {
        ControlKind::Toggle { .. } => apply(s, &section, &path, FormEvent::Toggle),
        ControlKind::Select { value, options } => {
            let mut view = SelectView::<String>::new();
            for option in options {
                view.add_item(option.label.clone(), option.value.clone());
            }
            if let Some(index) = options.iter().position(|o| &o.value == value) {
                let _ = view.set_selection(index);
            }
            let view = view.on_submit(move |s, value: &String| {
                s.pop_layer();
                apply(s, &section, &path, FormEvent::select(value.clone()));
            });
            s.add_layer(Dialog::around(view.scrollable()).title(control.label.clone()));
        }
        ControlKind::Color { text, .. } => {
            edit_text(s, &control.label, text, section, path);
        }
        ControlKind::Number { value, .. } => {
            let current = value.map(|n| n.to_string()).unwrap_or_default();
            edit_text(s, &control.label, &current, section, path);
        }
        ControlKind::Text { value, .. } => {
            edit_text(s, &control.label, value, section, path);
        }
        ControlKind::CheckboxList { options } => {
            let mut view = SelectView::<String>::new();
            for option in options {
                let mark = if option.checked { "[x]" } else { "[ ]" };
                view.add_item(format!("{mark} {}", option.label), option.value.clone());
            }
            let view = view.on_submit(move |s, value: &String| {
                s.pop_layer();
                let event = FormEvent::ToggleOption {
                    value: value.clone(),
                };
                apply(s, &section, &path, event);
            });
            s.add_layer(Dialog::around(view).title(control.label.clone()));
        }
        ControlKind::BarList { bars } => {
            let labels = bars
                .iter()
                .map(|b| format!("{} {}", if b.enabled { "[x]" } else { "[ ]" }, b.label));
            list_dialog(s, &control.label, labels, section, path, |index, action| {
                match action {
                    ListAction::Submit => Some(FormEvent::ToggleBar { index }),
                    ListAction::Move(direction) => Some(FormEvent::MoveBar { index, direction }),
                    _ => None,
                }
            });
        }
        ControlKind::ButtonManager { buttons, .. } => {
            let labels = buttons.iter().map(|b| {
                b.get("label")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            });
            list_dialog(s, &control.label, labels, section, path, |index, action| {
                let op = match action {
                    ListAction::Submit => return None,
                    ListAction::Move(direction) => ButtonOp::Move { index, direction },
                    ListAction::Add => ButtonOp::Add,
                    ListAction::Duplicate => ButtonOp::Duplicate { index },
                    ListAction::Delete => ButtonOp::Delete { index },
                    ListAction::CopyStyle => ButtonOp::CopyStyleToAll { index },
                };
                Some(FormEvent::Button { op })
            });
        }
        ControlKind::Group { entries } => {
            let mut view = SelectView::<(String, String)>::new();
            for (key, value) in entries {
                let text = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                view.add_item(format!("{key}: {text}"), (key.clone(), text));
            }
            let label = control.label.clone();
            let view = view.on_submit(move |s, (key, text): &(String, String)| {
                s.pop_layer();
                let section = section.clone();
                let path = path.clone();
                let key = key.clone();
                let title = format!("{label} / {key}");
                let editor = EditView::new()
                    .content(text.clone())
                    .on_submit(move |s, raw: &str| {
                        let value = serde_json::from_str(raw)
                            .unwrap_or_else(|_| Value::String(raw.to_string()));
                        s.pop_layer();
                        apply(s, &section, &path, FormEvent::group_entry(key.clone(), value));
                    });
                s.add_layer(
                    Dialog::around(editor.min_width(32)).title(title),
                );
            });
            s.add_layer(Dialog::around(view.scrollable()).title(control.label.clone()));
        }
    }
}

fn edit_text(s: &mut Cursive, label: &str, current: &str, section: String, path: String) {
    let view = EditView::new()
        .content(current)
        .on_submit(move |s, raw: &str| {
            s.pop_layer();
            apply(s, &section, &path, FormEvent::input(raw));
        });
    s.add_layer(Dialog::around(view.min_width(32)).title(label));
}

#[derive(Clone, Copy)]
enum ListAction {
    Submit,
    Move(Direction),
    Add,
    Duplicate,
    Delete,
    CopyStyle,
}

/// A list with move/add/duplicate/delete buttons. `to_event` maps an
/// action on the selected index to a form event.
fn list_dialog(
    s: &mut Cursive,
    label: &str,
    items: impl Iterator<Item = String>,
    section: String,
    path: String,
    to_event: fn(usize, ListAction) -> Option<FormEvent>,
) {
    const LIST: &str = "list-items";

    let act = move |section: String, path: String, action: ListAction| {
        move |s: &mut Cursive| {
            let index = s
                .call_on_name(LIST, |v: &mut SelectView<usize>| v.selected_id())
                .flatten()
                .unwrap_or(0);
            if let Some(event) = to_event(index, action) {
                s.pop_layer();
                apply(s, &section, &path, event);
            }
        }
    };

    let mut view = SelectView::<usize>::new();
    for (index, item) in items.enumerate() {
        view.add_item(item, index);
    }
    let submit = {
        let (section, path) = (section.clone(), path.clone());
        move |s: &mut Cursive, index: &usize| {
            if let Some(event) = to_event(*index, ListAction::Submit) {
                s.pop_layer();
                apply(s, &section, &path, event);
            }
        }
    };
    let view = view.on_submit(submit).with_name(LIST);

    let mut dialog = Dialog::around(view.scrollable()).title(label);
    for (name, action) in [
        ("Up", ListAction::Move(Direction::Up)),
        ("Down", ListAction::Move(Direction::Down)),
        ("Add", ListAction::Add),
        ("Duplicate", ListAction::Duplicate),
        ("Delete", ListAction::Delete),
        ("Copy style", ListAction::CopyStyle),
    ] {
        if to_event(0, action).is_some() {
            dialog.add_button(name, act(section.clone(), path.clone(), action));
        }
    }
    dialog.add_button("Back", |s| {
        s.pop_layer();
    });
    s.add_layer(dialog);
}
