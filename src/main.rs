//! Slide Puzzle entry point
//!
//! Handles platform-specific initialization and wires the presentation
//! layer to the session tracker.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, MouseEvent};

    use slide_puzzle::audio::AudioManager;
    use slide_puzzle::consts::SAVE_KEY;
    use slide_puzzle::persistence::LocalStorage;
    use slide_puzzle::{Difficulty, GamePhase, MoveOutcome, SessionTracker};

    type Tracker = SessionTracker<LocalStorage, AudioManager>;

    /// Game instance holding all state
    struct Game {
        tracker: Tracker,
        last_time: f64,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn by_id(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn on_click(el: &Element, handler: impl FnMut(MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    impl Game {
        /// Rebuild the tile grid
        fn render_board(&self) {
            let Some(document) = document() else { return };
            let Some(board_el) = by_id("board") else { return };
            let board = &self.tracker.session().board;

            if let Some(root) = document
                .document_element()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = root
                    .style()
                    .set_property("--grid-size", &board.size().to_string());
            }

            board_el.set_inner_html("");
            let hints = board.movable_indices();
            for (index, &tile) in board.tiles().iter().enumerate() {
                let Ok(el) = document.create_element("div") else { continue };
                el.set_class_name("tile");
                if tile == 0 {
                    let _ = el.class_list().add_1("empty");
                } else {
                    el.set_text_content(Some(&tile.to_string()));
                    let _ = el.set_attribute("data-index", &index.to_string());
                    if hints.contains(&index) {
                        let _ = el.class_list().add_1("tile-hint");
                    }
                }
                let _ = board_el.append_child(&el);
            }
        }

        /// Update HUD counters
        fn update_hud(&self) {
            let session = self.tracker.session();
            set_text("levelDisplay", &session.level.to_string());
            set_text("movesDisplay", &session.moves.to_string());
            set_text("timeDisplay", &format!("{}s", session.seconds));
        }

        fn update_controls(&self) {
            if let Some(btn) =
                by_id("shuffleBtn").and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(self.tracker.phase() != GamePhase::Playing);
            }
            let label = if self.tracker.session().sounds_enabled {
                "Sound: On"
            } else {
                "Sound: Off"
            };
            set_text("toggleSoundBtn", label);

            if let Some(summary) = self.tracker.level_summary() {
                set_text(
                    "overlayStats",
                    &format!(
                        "Level {} · Moves {} · Time {}s",
                        summary.level, summary.moves, summary.seconds
                    ),
                );
                set_hidden("levelOverlay", false);
            } else {
                set_hidden("levelOverlay", true);
            }
        }

        fn refresh(&self) {
            self.render_board();
            self.update_hud();
            self.update_controls();
        }
    }

    /// Difficulty from the checked radio button
    fn selected_difficulty() -> Difficulty {
        let Some(list) = document()
            .and_then(|d| d.query_selector_all("input[name='difficulty']").ok())
        else {
            return Difficulty::default();
        };

        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
            .find(|input| input.checked())
            .and_then(|input| Difficulty::from_str(&input.value()))
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Slide Puzzle starting...");

        let seed = js_sys::Date::now() as u64;
        let tracker = SessionTracker::new(LocalStorage::new(SAVE_KEY), AudioManager::new(), seed);
        let game = Rc::new(RefCell::new(Game {
            tracker,
            last_time: 0.0,
        }));

        let can_continue = game.borrow_mut().tracker.boot();
        if can_continue {
            setup_continue_button(game.clone());
        }

        setup_board_clicks(game.clone());
        setup_buttons(game.clone());

        game.borrow().refresh();
        request_animation_frame(game);

        log::info!("Slide Puzzle running!");
    }

    fn setup_continue_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let Some(start_btn) = by_id("startGameBtn") else { return };
        let Ok(btn) = document.create_element("button") else { return };

        btn.set_text_content(Some("Continue Game"));
        btn.set_class_name("btn primary-btn");
        let _ = start_btn.insert_adjacent_element("beforebegin", &btn);

        on_click(&btn, move |_event| {
            let mut g = game.borrow_mut();
            if g.tracker.continue_from_save() {
                set_hidden("startOverlay", true);
                g.refresh();
            }
        });
    }

    /// One delegated listener for every tile
    fn setup_board_clicks(game: Rc<RefCell<Game>>) {
        let Some(board_el) = by_id("board") else { return };

        on_click(&board_el, move |event| {
            let index = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-index"))
                .and_then(|i| i.parse::<usize>().ok());
            let Some(index) = index else { return };

            let mut g = game.borrow_mut();
            let applied = g.tracker.attempt_move(index);
            if applied.outcome == MoveOutcome::Solved {
                log::info!("Puzzle solved!");
            }
            if applied.outcome.is_move() {
                g.refresh();
            }
        });
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        if let Some(btn) = by_id("startGameBtn") {
            let game = game.clone();
            on_click(&btn, move |_event| {
                let mut g = game.borrow_mut();
                set_hidden("startOverlay", true);
                let _ = g.tracker.new_game(selected_difficulty());
                g.refresh();
            });
        }

        if let Some(btn) = by_id("shuffleBtn") {
            let game = game.clone();
            on_click(&btn, move |_event| {
                let mut g = game.borrow_mut();
                if g.tracker.shuffle_current().outcome {
                    g.refresh();
                }
            });
        }

        if let Some(btn) = by_id("nextLevelBtn") {
            let game = game.clone();
            on_click(&btn, move |_event| {
                let mut g = game.borrow_mut();
                if g.tracker.advance_level().outcome {
                    g.refresh();
                }
            });
        }

        if let Some(btn) = by_id("toggleSoundBtn") {
            on_click(&btn, move |_event| {
                let mut g = game.borrow_mut();
                g.tracker.toggle_sound();
                g.update_controls();
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) / 1000.0
            } else {
                0.0
            };
            g.last_time = time;

            if g.tracker.update(dt) > 0 {
                g.update_hud();
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    use slide_puzzle::persistence::FileStorage;
    use slide_puzzle::{
        Difficulty, FeedbackSink, GamePhase, MoveOutcome, SessionTracker, SoundEffect,
    };

    const DEFAULT_SAVE_PATH: &str = "swipe_save.json";

    /// Terminal bell for rejected taps, log lines for the rest
    struct TerminalFeedback;

    impl FeedbackSink for TerminalFeedback {
        fn play(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::MoveRejected {
                print!("\x07");
            }
            log::debug!("cue: {}", effect.as_str());
        }
    }

    type Tracker = SessionTracker<FileStorage, TerminalFeedback>;

    fn render(tracker: &Tracker) {
        let session = tracker.session();
        let size = session.grid_size();
        let width = (size * size - 1).to_string().len();

        println!();
        for row in session.board.tiles().chunks(size) {
            let cells: Vec<String> = row
                .iter()
                .map(|&t| {
                    if t == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{:>width$}", t)
                    }
                })
                .collect();
            println!("  {}", cells.join(" "));
        }
        println!(
            "level {} · moves {} · time {}s · sound {}",
            session.level,
            session.moves,
            session.seconds,
            if session.sounds_enabled { "on" } else { "off" }
        );
        if let Some(summary) = tracker.level_summary() {
            println!(
                "Level {} solved in {} moves, {}s! Type 'next' to continue.",
                summary.level, summary.moves, summary.seconds
            );
        }
    }

    fn help() {
        println!("commands: <tile number> | new [3|4|5] | continue | shuffle | next | sound | quit");
    }

    pub fn run() -> io::Result<()> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_SAVE_PATH.to_string());
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();

        let mut tracker = SessionTracker::new(FileStorage::new(&path), TerminalFeedback, seed);
        log::info!("Save file: {}", tracker.storage().path().display());

        if tracker.boot() {
            println!("Saved game found. Type 'continue' to resume it.");
        }
        help();
        render(&tracker);

        let mut last = Instant::now();
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }

            // Real time spent thinking counts toward the level clock
            let now = Instant::now();
            tracker.update(now.duration_since(last).as_secs_f64());
            last = now;

            let mut words = line.split_whitespace();
            let Some(cmd) = words.next() else { continue };

            match cmd {
                "q" | "quit" | "exit" => break,
                "new" => {
                    let difficulty = words
                        .next()
                        .and_then(Difficulty::from_str)
                        .unwrap_or_default();
                    let _ = tracker.new_game(difficulty);
                }
                "continue" => {
                    if !tracker.continue_from_save() {
                        println!("Nothing to continue.");
                    }
                }
                "shuffle" => {
                    if !tracker.shuffle_current().outcome {
                        println!("Start a game first.");
                    }
                }
                "next" => {
                    if !tracker.advance_level().outcome {
                        println!("Solve the board first.");
                    }
                }
                "sound" => {
                    tracker.toggle_sound();
                }
                tile => {
                    let Ok(tile) = tile.parse::<u16>() else {
                        help();
                        continue;
                    };
                    let index = tracker
                        .session()
                        .board
                        .tiles()
                        .iter()
                        .position(|&t| t == tile && t != 0);
                    let Some(index) = index else {
                        println!("No tile {}.", tile);
                        continue;
                    };
                    match tracker.attempt_move(index).outcome {
                        MoveOutcome::Rejected => println!("Tile {} can't move.", tile),
                        MoveOutcome::Inactive if tracker.phase() == GamePhase::Idle => {
                            println!("Start a game with 'new'.")
                        }
                        _ => {}
                    }
                }
            }
            render(&tracker);
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slide Puzzle (terminal) starting...");

    if let Err(e) = terminal::run() {
        log::error!("Terminal error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
