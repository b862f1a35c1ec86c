//! Browser front end for the quiz engine.
//!
//! Builds a small DOM skeleton once (one section per phase), wires listeners
//! with `Closure::wrap(...).forget()`, and re-renders the visible section after
//! every engine transition. The engine lives in a thread-local `RefCell`; no
//! borrow is ever held across an `.await`.

use js_sys::{Function, Promise};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, Document, HtmlElement, HtmlImageElement, HtmlInputElement, Response};

use crate::catalog::Catalog;
use crate::config::QuizConfig;
use crate::quiz::storage::LocalStorageStore;
use crate::quiz::{await_all_settled, GuessOutcome, Phase, ProbeResult, QuizEngine};

type Engine = QuizEngine<LocalStorageStore, StdRng>;

thread_local! {
    static QUIZ: std::cell::RefCell<Option<Engine>> = std::cell::RefCell::new(None);
    static CONFIG: std::cell::RefCell<QuizConfig> = std::cell::RefCell::new(QuizConfig::default());
}

const SECTIONS: [(Phase, &str); 5] = [
    (Phase::Loading, "tq-loading"),
    (Phase::Menu, "tq-menu"),
    (Phase::Preloading, "tq-preloading"),
    (Phase::Playing, "tq-playing"),
    (Phase::GameOver, "tq-gameover"),
];

const CARD_STYLE: &str = "max-width:28rem; margin:2rem auto; padding:1.5rem; text-align:center; background:#1f2937; color:#fff; border-radius:16px; box-shadow:0 4px 16px rgba(0,0,0,0.3); font-family:sans-serif;";
const BUTTON_STYLE: &str = "display:block; width:100%; margin:0.5rem 0; padding:0.5rem 1rem; background:#2563eb; color:#fff; border:none; border-radius:12px; font-weight:600; cursor:pointer;";

// --- Entry points --------------------------------------------------------------

#[wasm_bindgen]
pub fn start_quiz() -> Result<(), JsValue> {
    launch(QuizConfig::default())
}

/// Same as `start_quiz` with a JSON object of `QuizConfig` overrides.
#[wasm_bindgen]
pub fn start_quiz_with_config(config_json: &str) -> Result<(), JsValue> {
    let config =
        QuizConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    launch(config)
}

fn launch(config: QuizConfig) -> Result<(), JsValue> {
    let doc = document()?;
    build_dom(&doc)?;

    let store = LocalStorageStore::new(config.high_score_key.clone());
    let engine = QuizEngine::new(store, StdRng::from_entropy());
    QUIZ.with(|q| q.replace(Some(engine)));
    let catalog_url = config.catalog_url.clone();
    CONFIG.with(|c| c.replace(config));
    render();

    spawn_local(async move {
        let catalog = match fetch_catalog(&catalog_url).await {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load {catalog_url}: {e:?}");
                Catalog::default()
            }
        };
        with_engine(|q| q.catalog_loaded(catalog));
        render();
    });
    Ok(())
}

// --- Engine access ---------------------------------------------------------------

fn with_engine<T>(f: impl FnOnce(&mut Engine) -> T) -> Option<T> {
    QUIZ.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn document() -> Result<Document, JsValue> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

// --- Catalog fetch ---------------------------------------------------------------

async fn fetch_catalog(url: &str) -> Result<Catalog, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(win.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let text = JsFuture::from(response.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| JsValue::from_str("catalog body is not text"))?;
    Ok(Catalog::from_json_or_empty(&text))
}

// --- Preloading ------------------------------------------------------------------

/// Resolves with `true` on load and `false` on error.
fn probe_image(url: &str) -> Result<Promise, JsValue> {
    let img = HtmlImageElement::new()?;
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let on_load = resolve.clone();
        let load = Closure::once_into_js(move || {
            let _ = on_load.call1(&JsValue::NULL, &JsValue::TRUE);
        });
        let error = Closure::once_into_js(move || {
            let _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
        });
        img.set_onload(Some(load.unchecked_ref()));
        img.set_onerror(Some(error.unchecked_ref()));
    });
    img.set_src(url);
    Ok(promise)
}

fn sleep_ms(ms: u32) -> Promise {
    Promise::new(&mut |resolve: Function, _reject: Function| {
        if let Some(w) = window() {
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    })
}

fn on_start() {
    let started = with_engine(|q| q.start().map(|ticket| (ticket, q.preload_urls())));
    let (ticket, urls) = match started {
        Some(Ok(started)) => started,
        Some(Err(e)) => {
            log::warn!("{e}");
            return;
        }
        None => return,
    };
    render();

    let timeout_ms = CONFIG.with(|c| c.borrow().preload_timeout_ms);
    let probes: Vec<_> = urls
        .iter()
        .map(|url| {
            let promise = probe_image(url);
            async move {
                let Ok(promise) = promise else {
                    return ProbeResult::Failed;
                };
                match JsFuture::from(promise).await {
                    Ok(v) if v.as_bool() == Some(true) => ProbeResult::Loaded,
                    _ => ProbeResult::Failed,
                }
            }
        })
        .collect();

    spawn_local(async move {
        let timeout = async move {
            let _ = JsFuture::from(sleep_ms(timeout_ms)).await;
        };
        let report = await_all_settled(probes, timeout).await;
        with_engine(|q| q.finish_preload(ticket, &report));
        render();
    });
}

// --- Input handlers --------------------------------------------------------------

fn guess_input() -> Option<HtmlInputElement> {
    document()
        .ok()?
        .get_element_by_id("tq-guess")?
        .dyn_into()
        .ok()
}

fn on_submit() {
    let Some(input) = guess_input() else {
        return;
    };
    let guess = input.value();
    if let Some(GuessOutcome::Correct { .. } | GuessOutcome::Wrong { .. }) =
        with_engine(|q| q.submit_guess(&guess))
    {
        input.set_value("");
    }
    render();
}

fn on_restart() {
    if let Some(Err(e)) = with_engine(|q| q.restart()) {
        log::warn!("{e}");
    }
    render();
}

fn on_menu() {
    if let Some(Err(e)) = with_engine(|q| q.return_to_menu()) {
        log::warn!("{e}");
    }
    render();
}

// --- DOM construction ------------------------------------------------------------

fn add_listener(
    doc: &Document,
    id: &str,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let el = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?;
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn build_dom(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("tq-root").is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let root = doc.create_element("div")?;
    root.set_id("tq-root");
    root.set_attribute("style", CARD_STYLE)?;
    root.set_inner_html(&format!(
        r#"<div id="tq-loading"><h1>Loading towers metadata...</h1></div>
<div id="tq-menu">
  <h1>Guess the EToH Tower</h1>
  <label style="display:flex; justify-content:space-between; align-items:center; margin-bottom:1rem;">
    <span style="text-align:left;"><b>Include Pit of Misery</b><br><small id="tq-bonus-count"></small></span>
    <input id="tq-include-bonus" type="checkbox" aria-label="Include Pit of Misery towers">
  </label>
  <button id="tq-start" style="{BUTTON_STYLE}">Start Game</button>
  <p id="tq-menu-note" style="color:#fca5a5;"></p>
  <small>Tip: type the acronym (e.g. <b>ToM</b>) or full tower name.</small>
</div>
<div id="tq-preloading"><h1>Loading images...</h1></div>
<div id="tq-playing">
  <h1>Guess the EToH Tower</h1>
  <img id="tq-image" alt="tower" style="max-height:16rem; max-width:100%; border-radius:12px; object-fit:contain;">
  <input id="tq-guess" placeholder="Type your guess and press Enter or Submit..." style="display:block; width:100%; box-sizing:border-box; margin:0.75rem 0; padding:0.5rem;">
  <button id="tq-submit" style="{BUTTON_STYLE}">Submit</button>
  <div style="display:flex; justify-content:space-between;"><span id="tq-score"></span><span id="tq-high"></span></div>
</div>
<div id="tq-gameover">
  <h1>Game Over!</h1>
  <p id="tq-final-score"></p>
  <p id="tq-final-high"></p>
  <p id="tq-missed"></p>
  <button id="tq-restart" style="{BUTTON_STYLE}">Play Again</button>
  <button id="tq-back" style="{BUTTON_STYLE}">Back to Menu</button>
</div>"#
    ));
    body.append_child(&root)?;

    add_listener(doc, "tq-start", "click", |_| on_start())?;
    add_listener(doc, "tq-submit", "click", |_| on_submit())?;
    add_listener(doc, "tq-restart", "click", |_| on_restart())?;
    add_listener(doc, "tq-back", "click", |_| on_menu())?;
    add_listener(doc, "tq-guess", "keydown", |evt| {
        if let Some(key) = evt.dyn_ref::<web_sys::KeyboardEvent>() {
            if key.key() == "Enter" {
                on_submit();
            }
        }
    })?;
    add_listener(doc, "tq-include-bonus", "change", |evt| {
        let checked = evt
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .map(|i| i.checked())
            .unwrap_or(false);
        with_engine(|q| q.set_include_bonus(checked));
    })?;
    Ok(())
}

// --- Rendering -------------------------------------------------------------------

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn set_visible(doc: &Document, id: &str, visible: bool) {
    if let Some(el) = doc
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    {
        let _ = el
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }
}

/// Snapshot of everything the view needs, taken while the engine is borrowed.
struct View {
    phase: Phase,
    score: u32,
    high_score: u32,
    bonus_count: usize,
    image_url: Option<String>,
    missed: Option<String>,
    empty_pool: bool,
}

fn render() {
    let Ok(doc) = document() else {
        return;
    };
    let Some(view) = with_engine(|q| View {
        phase: q.phase(),
        score: q.score(),
        high_score: q.high_score(),
        bonus_count: q.bonus_count(),
        image_url: q.current().map(|e| e.url.clone()),
        missed: q.missed_answer().map(str::to_owned),
        empty_pool: q.default_count() == 0 && !(q.include_bonus() && q.bonus_count() > 0),
    }) else {
        return;
    };

    for (phase, id) in SECTIONS {
        set_visible(&doc, id, phase == view.phase);
    }

    match view.phase {
        Phase::Loading => {}
        Phase::Menu | Phase::Preloading => {
            set_text(&doc, "tq-bonus-count", &format!("{} towers", view.bonus_count));
            set_text(
                &doc,
                "tq-menu-note",
                if view.empty_pool { "No images available for the selected set." } else { "" },
            );
            if let Some(btn) = doc
                .get_element_by_id("tq-start")
                .and_then(|e| e.dyn_into::<web_sys::HtmlButtonElement>().ok())
            {
                btn.set_disabled(view.phase == Phase::Preloading);
            }
        }
        Phase::Playing => {
            if let (Some(url), Some(img)) = (
                view.image_url.as_deref(),
                doc.get_element_by_id("tq-image")
                    .and_then(|e| e.dyn_into::<HtmlImageElement>().ok()),
            ) {
                img.set_src(url);
            }
            set_text(&doc, "tq-score", &format!("Score: {}", view.score));
            set_text(&doc, "tq-high", &format!("High Score: {}", view.high_score));
            if let Some(input) = guess_input() {
                let _ = input.focus();
            }
        }
        Phase::GameOver => {
            set_text(&doc, "tq-final-score", &format!("Your Score: {}", view.score));
            set_text(&doc, "tq-final-high", &format!("High Score: {}", view.high_score));
            let missed = view
                .missed
                .map(|a| format!("Correct Answer was: {a}"))
                .unwrap_or_default();
            set_text(&doc, "tq-missed", &missed);
        }
    }
}
