// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! A line-oriented terminal front end.
//!
//! `ConsoleHost` implements `Host` on top of any reader/writer pair and
//! runs a small command loop that turns typed commands into controller
//! events. Dialogs become a series of prompts; a blank answer keeps the
//! value shown in brackets.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::data::{AppState, ViewerMode};
use crate::dialogs::{
    AdjustGlyphSetting, AdjustPosSetting, FindQuery, GlyphSetting, OsGameSetting, Prompt,
    StartCode, SyncChoice, SyncConfig, UnicodeSetting, Warning, format_codepoint_list,
    parse_codepoint_list, parse_optional_number,
};
use crate::events::{FunctionKey, ProgramEvent, ProjectEvent, SaveType, ViewerEvent};
use crate::host::{Host, PreviewFormat};
use crate::model::workspace::{Glyph, Workspace};
use crate::project::ProjectId;

const HELP: &str = "\
commands:
  ls                     list the current page
  sel LIST               select glyphs (e.g. `sel 1 4-6`)
  left | right           move the selection, or step through glyphs in the editor
  page N | refresh       change page
  del|copy|cut [LIST]    act on LIST or the selection
  paste | undo | redo
  edit N                 open a glyph in the editor
  width N                set the advance width of the editing glyph
  pos | transform | glyph | find | unicode | osgame
                         open the matching dialog
  download [LIST]        export the first glyph as JSON
  save | save! | save-glyph | saveas
  write [PATH]           write the font as a UFO
  new NAME | load PATH   start or open a font
  projects | open ID | sync ID | rmproject ID | sync-setting
  f2 | f3 | f4           toggle editor, TTF preview, WOFF preview
  help | quit";

/// Terminal implementation of `Host`
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the host, returning the writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: impl std::fmt::Display) {
        if let Err(e) = writeln!(self.output, "{text}") {
            tracing::warn!("Console write failed: {}", e);
        }
    }

    /// Print a prompt and read one trimmed line; `None` at end of input
    fn ask(&mut self, question: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{question} ").and_then(|_| self.output.flush()) {
            tracing::warn!("Console write failed: {}", e);
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("Console read failed: {}", e);
                None
            }
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> Option<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Some(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Ask for an optional number; blank keeps `current`
    fn ask_number(&mut self, label: &str, current: Option<f64>) -> Option<Option<f64>> {
        let hint = current.map(|v| v.to_string()).unwrap_or_default();
        let answer = self.ask(&format!("{label} [{hint}]:"))?;
        if answer.is_empty() {
            return Some(current);
        }
        match parse_optional_number(&answer) {
            Ok(value) => Some(value),
            Err(e) => {
                self.say(e);
                None
            }
        }
    }

    fn ask_start_code(&mut self, title: &str) -> Option<UnicodeSetting> {
        let answer = self.ask(&format!("{title} start code ($E000):"))?;
        let start = if answer.is_empty() {
            StartCode(0xE000)
        } else {
            match answer.parse::<StartCode>() {
                Ok(start) => start,
                Err(e) => {
                    self.say(e);
                    return None;
                }
            }
        };
        let generate_names = self.ask_yes_no("Generate glyph names?")?;
        Some(UnicodeSetting {
            start,
            generate_names,
        })
    }

    // ------------------------------------------------------------------
    // Command loop
    // ------------------------------------------------------------------

    /// Read commands until `quit` or end of input
    pub fn run(&mut self, app: &mut AppState) -> io::Result<()> {
        self.say("glyphweaver console; type `help` for commands");
        self.print_status(app);
        while app.running {
            let Some(line) = self.ask(">") else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            self.execute(app, &line);
            if let Some(error) = app.error_message.take() {
                self.say(format!("error: {error}"));
            }
        }
        self.output.flush()
    }

    /// Run a single command line
    pub fn execute(&mut self, app: &mut AppState, line: &str) {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return;
        };
        let args: Vec<&str> = words.collect();

        match command {
            "help" => self.say(HELP),
            "ls" => self.print_page(app),
            "sel" => match parse_indices(&args, app.font.glyph_count()) {
                Ok(list) => app.handle_viewer_event(self, ViewerEvent::Select(list)),
                Err(e) => self.say(e),
            },
            "left" => app.handle_viewer_event(self, ViewerEvent::MoveLeft),
            "right" => app.handle_viewer_event(self, ViewerEvent::MoveRight),
            "page" => match args.first().and_then(|p| p.parse().ok()) {
                Some(page) => app.handle_viewer_event(self, ViewerEvent::PageChange(page)),
                None => self.say("usage: page N"),
            },
            "refresh" => app.handle_viewer_event(self, ViewerEvent::Refresh),
            "del" | "copy" | "cut" | "download" => {
                let list = match list_or_selection(app, &args) {
                    Ok(list) => list,
                    Err(e) => return self.say(e),
                };
                let event = match command {
                    "del" => ViewerEvent::Delete(list),
                    "copy" => ViewerEvent::Copy(list),
                    "cut" => ViewerEvent::Cut(list),
                    _ => ViewerEvent::DownloadGlyph(list),
                };
                app.handle_viewer_event(self, event);
            }
            "paste" => app.handle_program_event(self, ProgramEvent::Paste),
            "undo" => app.handle_viewer_event(self, ViewerEvent::Undo),
            "redo" => app.handle_viewer_event(self, ViewerEvent::Redo),
            "edit" => match args.first().and_then(|i| i.parse().ok()) {
                Some(index) if index < app.font.glyph_count() => {
                    app.handle_viewer_event(self, ViewerEvent::Edit(index))
                }
                _ => self.say("usage: edit INDEX"),
            },
            "width" => match (
                args.first().and_then(|w| w.parse::<f64>().ok()),
                app.editor.session.as_mut(),
            ) {
                (Some(width), Some(session)) => session.set_width(width),
                (None, _) => self.say("usage: width N"),
                (_, None) => self.say("no glyph in the editor"),
            },
            "pos" => app.handle_viewer_event(self, ViewerEvent::AdjustPos),
            "transform" => app.handle_viewer_event(self, ViewerEvent::AdjustGlyph),
            "glyph" => app.handle_viewer_event(self, ViewerEvent::SettingFont),
            "find" => app.handle_viewer_event(self, ViewerEvent::FindGlyph),
            "unicode" => app.handle_viewer_event(self, ViewerEvent::SettingUnicode),
            "osgame" => app.handle_viewer_event(self, ViewerEvent::SettingOsGame),
            "sync-setting" => app.handle_viewer_event(self, ViewerEvent::SettingSync),
            "save" => app.handle_program_event(self, ProgramEvent::Save(SaveType::Normal)),
            "save!" => app.handle_program_event(self, ProgramEvent::Save(SaveType::Force)),
            "save-glyph" => app.handle_program_event(self, ProgramEvent::Save(SaveType::Editor)),
            "saveas" => app.handle_project_event(self, ProjectEvent::SaveAs),
            "write" => app.save_workspace_file(args.first().map(PathBuf::from)),
            "new" => app.create_new_font(&args.join(" ")),
            "load" => match args.first() {
                Some(path) => app.load_font(&PathBuf::from(path)),
                None => self.say("usage: load PATH"),
            },
            "projects" => self.print_projects(app),
            "open" | "sync" | "rmproject" => {
                let Some(id) = args.first().map(|id| ProjectId::from(*id)) else {
                    return self.say(format!("usage: {command} ID"));
                };
                let event = match command {
                    "open" => ProjectEvent::Open(id),
                    "sync" => ProjectEvent::Sync(id),
                    _ => ProjectEvent::Delete(id),
                };
                app.handle_project_event(self, event);
            }
            "f2" => app.handle_program_event(self, ProgramEvent::Function(FunctionKey::F2)),
            "f3" => app.handle_program_event(self, ProgramEvent::Function(FunctionKey::F3)),
            "f4" => app.handle_program_event(self, ProgramEvent::Function(FunctionKey::F4)),
            "quit" | "exit" => {
                let leave = match app.confirm_exit() {
                    Some(prompt) => self.confirm(prompt),
                    None => true,
                };
                if leave {
                    app.running = false;
                }
            }
            other => self.say(format!("unknown command '{other}'; try `help`")),
        }
        if app.running && command != "ls" && command != "help" {
            self.print_status(app);
        }
    }

    fn print_status(&mut self, app: &AppState) {
        let Some(font) = app.font.get() else {
            self.say("no font loaded (`new NAME` or `load PATH`)");
            return;
        };
        let mut status = format!(
            "{}{} | {} glyphs | page {}/{}",
            font.display_name(),
            if app.font.is_changed() { " *" } else { "" },
            font.glyph_count(),
            app.viewer.page,
            app.total_pages(),
        );
        if !app.viewer.selection.is_empty() {
            status.push_str(&format!(" | selected {:?}", app.viewer.selection.to_vec()));
        }
        if let (ViewerMode::Editor, Some(session)) = (app.viewer.mode, &app.editor.session) {
            status.push_str(&format!(
                " | editing '{}'{}",
                session.glyph.name,
                if session.changed { " *" } else { "" }
            ));
        }
        if let Some(saved) = app.last_saved_display() {
            status.push_str(&format!(" | saved {saved}"));
        }
        self.say(status);
    }

    fn print_page(&mut self, app: &AppState) {
        let Some(font) = app.font.get() else {
            return;
        };
        for index in app.viewer.shown.clone() {
            let Some(glyph) = font.get_glyph(index) else {
                continue;
            };
            let marker = match (
                app.viewer.editing == Some(index),
                app.viewer.selection.contains(index),
            ) {
                (true, _) => '>',
                (false, true) => '*',
                (false, false) => ' ',
            };
            self.say(format!(
                "{marker}{index:>5}  {:<20} {:<14} w={}",
                glyph.name,
                format_codepoint_list(&glyph.codepoints),
                glyph.width
            ));
        }
        if app.pager.visible {
            self.say(format!("page {}/{}", app.pager.page, app.pager.total_pages));
        }
    }

    fn print_projects(&mut self, app: &AppState) {
        if app.project_list.is_empty() {
            self.say("no projects");
        }
        for project in &app.project_list {
            let current = if app.project_id.as_ref() == Some(&project.id) {
                '*'
            } else {
                ' '
            };
            self.say(format!("{current} {:<6} {}", project.id, project.name));
        }
    }
}

impl<R: BufRead, W: Write> Host for ConsoleHost<R, W> {
    fn confirm(&mut self, prompt: Prompt) -> bool {
        self.ask_yes_no(prompt.message()).unwrap_or(false)
    }

    fn warn(&mut self, warning: Warning) {
        self.say(format!("warning: {warning}"));
    }

    fn adjust_pos_dialog(&mut self, prefill: &AdjustPosSetting) -> Option<AdjustPosSetting> {
        let left_side_bearing = self.ask_number("Left side bearing", prefill.left_side_bearing)?;
        let right_side_bearing =
            self.ask_number("Right side bearing", prefill.right_side_bearing)?;
        Some(AdjustPosSetting {
            left_side_bearing,
            right_side_bearing,
        })
    }

    fn adjust_glyph_dialog(&mut self) -> Option<AdjustGlyphSetting> {
        let answer = self.ask("Transform (flip mirror scale=N fit padding=N):")?;
        let mut setting = AdjustGlyphSetting::default();
        for word in answer.split_whitespace() {
            match word.split_once('=') {
                None if word == "flip" => setting.flip_vertical = true,
                None if word == "mirror" => setting.mirror = true,
                None if word == "fit" => setting.fit_em_box = true,
                Some(("scale", value)) => match value.parse() {
                    Ok(scale) => setting.scale = Some(scale),
                    Err(_) => {
                        self.say(format!("'{value}' is not a number"));
                        return None;
                    }
                },
                Some(("padding", value)) => match value.parse() {
                    Ok(padding) => setting.em_padding = padding,
                    Err(_) => {
                        self.say(format!("'{value}' is not a number"));
                        return None;
                    }
                },
                _ => {
                    self.say(format!("unknown transform '{word}'"));
                    return None;
                }
            }
        }
        Some(setting)
    }

    fn glyph_dialog(&mut self, prefill: &GlyphSetting) -> Option<GlyphSetting> {
        let name = self.ask(&format!("Name [{}]:", prefill.name))?;
        let codepoints = self.ask(&format!(
            "Codepoints [{}]:",
            format_codepoint_list(&prefill.codepoints)
        ))?;
        let codepoints = if codepoints.is_empty() {
            prefill.codepoints.clone()
        } else {
            match parse_codepoint_list(&codepoints) {
                Ok(list) => list,
                Err(e) => {
                    self.say(e);
                    return None;
                }
            }
        };
        let left_side_bearing = self.ask_number("Left side bearing", prefill.left_side_bearing)?;
        let right_side_bearing =
            self.ask_number("Right side bearing", prefill.right_side_bearing)?;
        Some(GlyphSetting {
            name: if name.is_empty() {
                prefill.name.clone()
            } else {
                name
            },
            codepoints,
            left_side_bearing,
            right_side_bearing,
        })
    }

    fn find_glyph_dialog(&mut self) -> Option<FindQuery> {
        let answer = self.ask("Find ($XXXX list or name):")?;
        if answer.is_empty() {
            return None;
        }
        if answer.starts_with('$') {
            match parse_codepoint_list(&answer) {
                Ok(list) => Some(FindQuery::Unicode(list)),
                Err(e) => {
                    self.say(e);
                    None
                }
            }
        } else {
            Some(FindQuery::Name(answer))
        }
    }

    fn unicode_dialog(&mut self) -> Option<UnicodeSetting> {
        self.ask_start_code("Unicode")
    }

    fn osgame_dialog(&mut self) -> Option<OsGameSetting> {
        self.ask_start_code("OSGame")
    }

    fn sync_dialog(&mut self, prefill: &SyncConfig) -> Option<SyncChoice> {
        let name = self.ask(&format!("Sync name [{}] (`off` disables):", prefill.name))?;
        if name == "off" {
            return Some(SyncChoice::Disable);
        }
        let url = self.ask(&format!(
            "Sync URL [{}]:",
            prefill.url.as_deref().unwrap_or_default()
        ))?;
        let auto_sync = self.ask_yes_no("Sync after every save?")?;
        Some(SyncChoice::Enable(SyncConfig {
            name,
            url: (!url.is_empty()).then_some(url),
            auto_sync,
        }))
    }

    fn project_name_dialog(&mut self, suggested: &str) -> Option<String> {
        let answer = self.ask(&format!("Project name [{suggested}]:"))?;
        Some(if answer.is_empty() {
            suggested.to_string()
        } else {
            answer
        })
    }

    fn download_glyph(&mut self, _font: &Workspace, glyph: &Glyph) {
        match serde_json::to_string(glyph) {
            Ok(json) => self.say(json),
            Err(e) => self.say(format!("error: {e}")),
        }
    }

    fn preview(&mut self, font: &Workspace, format: PreviewFormat) {
        self.say(format!(
            "{format:?} preview of {} is not available in the console",
            font.display_name()
        ));
    }

    fn sync_project(
        &mut self,
        id: &ProjectId,
        _font: &Workspace,
        config: &SyncConfig,
    ) -> anyhow::Result<()> {
        anyhow::bail!(
            "project {id} ({}) has no sync client in the console",
            config.name
        )
    }
}

/// Parse `1 3 5-7` into indices below `count`
fn parse_indices(args: &[&str], count: usize) -> Result<Vec<usize>, String> {
    let mut list = Vec::new();
    for arg in args {
        let bad = || format!("'{arg}' is not an index or range");
        let (from, to) = match arg.split_once('-') {
            Some((from, to)) => (
                from.parse::<usize>().map_err(|_| bad())?,
                to.parse::<usize>().map_err(|_| bad())?,
            ),
            None => {
                let index = arg.parse::<usize>().map_err(|_| bad())?;
                (index, index)
            }
        };
        if from > to {
            return Err(format!("range '{arg}' runs backwards"));
        }
        if to >= count {
            return Err(format!("'{arg}' is past the last glyph ({count} glyphs)"));
        }
        list.extend(from..=to);
    }
    Ok(list)
}

fn list_or_selection(app: &AppState, args: &[&str]) -> Result<Vec<usize>, String> {
    if args.is_empty() {
        Ok(app.viewer.selection.to_vec())
    } else {
        parse_indices(args, app.font.glyph_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{app_with, names};
    use std::io::Cursor;

    fn host(input: &str) -> ConsoleHost<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleHost::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(host: ConsoleHost<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(host.into_output()).unwrap()
    }

    #[test]
    fn test_parse_indices() {
        assert_eq!(parse_indices(&["1", "4-6"], 10), Ok(vec![1, 4, 5, 6]));
        assert!(parse_indices(&["x"], 10).is_err());
        assert!(parse_indices(&["2-"], 10).is_err());
        assert!(parse_indices(&["5-2"], 10).unwrap_err().contains("backwards"));
        assert!(parse_indices(&["10"], 10).is_err());
        assert!(parse_indices(&["0-18446744073709551615"], 10).is_err());
        assert!(parse_indices(&["0-4000000000"], 10).is_err());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_prompts_survive_write_errors() {
        let mut console = ConsoleHost::new(Cursor::new(b"Bold\n".to_vec()), BrokenPipe);
        assert_eq!(console.project_name_dialog("Regular"), Some("Bold".to_string()));
        console.warn(Warning::NoMatchingGlyph);
    }

    #[test]
    fn test_oversized_range_is_refused() {
        let mut app = app_with("ab");
        let mut console = host("sel 1\nsel 0-18446744073709551615\n");
        console.run(&mut app).unwrap();
        assert_eq!(app.viewer.selection.to_vec(), vec![1]);
        assert!(output(console).contains("past the last glyph"));
    }

    #[test]
    fn test_session_moves_and_quits() {
        let mut app = app_with("abc");
        let mut console = host("sel 3\nleft\nleft\nls\nquit\ny\n");
        console.run(&mut app).unwrap();

        assert_eq!(names(&app), vec![".notdef", "c", "a", "b"]);
        assert!(!app.running);
        let out = output(console);
        assert!(out.contains("*    1  c"));
        assert!(out.contains(Prompt::DiscardProjectChanges.message()));
    }

    #[test]
    fn test_quit_can_be_cancelled() {
        let mut app = app_with("ab");
        let mut console = host("del 1\nquit\nn\n");
        console.run(&mut app).unwrap();
        // Input ran out after the refusal; the app was never told to stop
        assert!(app.running);
    }

    #[test]
    fn test_unicode_dialog_prompts() {
        let mut console = host("$e000\ny\n");
        let setting = console.unicode_dialog().unwrap();
        assert_eq!(setting.start, StartCode(0xE000));
        assert!(setting.generate_names);

        let mut console = host("E000\n");
        assert_eq!(console.unicode_dialog(), None);
        assert!(output(console).contains("start code must look like"));
    }

    #[test]
    fn test_glyph_dialog_keeps_blank_fields() {
        let prefill = GlyphSetting {
            name: "a".to_string(),
            codepoints: vec!['a'],
            left_side_bearing: Some(50.0),
            right_side_bearing: Some(60.0),
        };
        let mut console = host("\n$62\n\n10\n");
        let setting = console.glyph_dialog(&prefill).unwrap();
        assert_eq!(setting.name, "a");
        assert_eq!(setting.codepoints, vec!['b']);
        assert_eq!(setting.left_side_bearing, Some(50.0));
        assert_eq!(setting.right_side_bearing, Some(10.0));
    }

    #[test]
    fn test_transform_dialog() {
        let mut console = host("mirror scale=0.5 padding=20\n");
        let setting = console.adjust_glyph_dialog().unwrap();
        assert!(setting.mirror);
        assert!(!setting.flip_vertical);
        assert_eq!(setting.scale, Some(0.5));
        assert_eq!(setting.em_padding, 20.0);

        let mut console = host("wobble\n");
        assert_eq!(console.adjust_glyph_dialog(), None);
    }

    #[test]
    fn test_find_dialog() {
        let mut console = host("$41,$42\nalpha\n");
        assert_eq!(
            console.find_glyph_dialog(),
            Some(FindQuery::Unicode(vec!['A', 'B']))
        );
        assert_eq!(
            console.find_glyph_dialog(),
            Some(FindQuery::Name("alpha".to_string()))
        );
    }

    #[test]
    fn test_sync_dialog_off() {
        let mut console = host("off\n");
        assert_eq!(
            console.sync_dialog(&SyncConfig::default()),
            Some(SyncChoice::Disable)
        );
    }

    #[test]
    fn test_edit_and_save_glyph() {
        let mut app = app_with("ab");
        let mut console = host("edit 2\nwidth 321\nsave-glyph\nquit\ny\n");
        console.run(&mut app).unwrap();
        assert_eq!(app.font.get().unwrap().glyphs[2].width, 321.0);
        assert!(output(console).contains("editing 'b'"));
    }
}
