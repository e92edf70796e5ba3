//! Browser entry points (wasm32 only).
//!
//! One [`App`] lives in a `thread_local!` slot. JS calls the exported functions below (or
//! clicks rendered buttons, which route through the same functions); timer
//! callbacks re-enter through [`fire_timer`]. After every mutation the DOM is
//! redrawn and the optional `on_change` callback receives a fresh snapshot.
//! The `RefCell` borrow is always released before any JS is called so host
//! callbacks may call straight back into these exports.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, window};

use crate::checkin::local_today;
use crate::config::GameConfig;
use crate::game::{Game, GameSnapshot, PaymentAction};
use crate::storage::BrowserStore;
use crate::timers::{BrowserTimers, TimerId};
use crate::wallet::{TxRequest, WalletError};

mod render;

#[wasm_bindgen]
extern "C" {
    /// Wallet object supplied by the mini-app shell.
    #[derive(Clone, Debug)]
    pub type WalletBridge;

    /// Resolves to `{ address }`.
    #[wasm_bindgen(method, catch)]
    async fn connect(this: &WalletBridge) -> Result<JsValue, JsValue>;

    /// Resolves to `{ transactionHash }`.
    #[wasm_bindgen(method, catch, js_name = sendTransaction)]
    async fn send_transaction(this: &WalletBridge, request: JsValue) -> Result<JsValue, JsValue>;
}

struct App {
    game: Game<BrowserTimers>,
    wallet: WalletBridge,
    root: Element,
    on_change: Option<js_sys::Function>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Redraw and notify. Must be called with no outstanding borrow of `APP`.
fn refresh() {
    let frame = with_app(|app| {
        app.game.refresh_day(local_today());
        (app.game.snapshot(), app.root.clone(), app.on_change.clone())
    });
    let Some((snapshot, root, on_change)) = frame else {
        return;
    };
    if let Err(e) = render::render(&root, &snapshot) {
        log::warn!("render failed: {e:?}");
    }
    if let Some(cb) = on_change {
        match serde_wasm_bindgen::to_value(&snapshot) {
            Ok(value) => {
                if let Err(e) = cb.call1(&JsValue::NULL, &value) {
                    log::warn!("on_change callback threw: {e:?}");
                }
            }
            Err(e) => log::warn!("snapshot serialization failed: {e}"),
        }
    }
}

fn fire_timer(id: TimerId) {
    if with_app(|app| app.game.fire(id)).is_some() {
        refresh();
    }
}

/// Mount the game into the element with id `root_id` (created if missing).
#[wasm_bindgen]
pub fn start_game(
    root_id: &str,
    wallet: WalletBridge,
    config_json: Option<String>,
    on_change: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = match config_json.as_deref() {
        Some(raw) => GameConfig::from_json(raw).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => GameConfig::default(),
    };

    let root: Element = match doc.get_element_by_id(root_id) {
        Some(el) => el,
        None => {
            let el = doc.create_element("div")?;
            el.set_id(root_id);
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&el)?;
            el
        }
    };

    // A second start replaces the first; its timers must not outlive it.
    stop_game();

    let game = Game::new(
        config,
        Box::new(BrowserStore::open()),
        BrowserTimers::new(fire_timer),
        StdRng::from_entropy(),
        local_today(),
    );
    render::install_click_listener(&root)?;
    APP.with(|cell| {
        cell.replace(Some(App {
            game,
            wallet,
            root,
            on_change,
        }))
    });
    refresh();
    Ok(())
}

/// Tear the game down, cancelling every pending timer.
#[wasm_bindgen]
pub fn stop_game() {
    let previous = APP.with(|cell| cell.borrow_mut().take());
    if let Some(mut app) = previous {
        app.game.dispose();
        render::remove_click_listener(&app.root);
        log::info!("game stopped");
    }
}

#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let snapshot: Option<GameSnapshot> = with_app(|app| app.game.snapshot());
    match snapshot {
        Some(s) => serde_wasm_bindgen::to_value(&s).map_err(JsValue::from),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen]
pub fn select_card(index: usize) {
    with_app(|app| app.game.select_card(index));
    refresh();
}

#[wasm_bindgen]
pub fn use_hint() -> bool {
    let used = with_app(|app| app.game.use_hint()).unwrap_or(false);
    refresh();
    used
}

#[wasm_bindgen]
pub fn dismiss_lesson() {
    with_app(|app| app.game.dismiss_lesson());
    refresh();
}

#[wasm_bindgen]
pub fn show_lesson() {
    with_app(|app| app.game.show_lesson());
    refresh();
}

/// Returns whether the answer was correct (false when no quiz is open).
#[wasm_bindgen]
pub fn answer_quiz(choice: usize) -> bool {
    let correct = with_app(|app| app.game.answer_quiz(choice))
        .flatten()
        .unwrap_or(false);
    refresh();
    correct
}

#[wasm_bindgen]
pub fn skip_transaction() {
    with_app(|app| app.game.skip_transaction());
    refresh();
}

#[wasm_bindgen]
pub fn restart_game() {
    with_app(|app| app.game.restart());
    refresh();
}

#[wasm_bindgen]
pub fn check_in() -> bool {
    let done = with_app(|app| app.game.check_in(local_today())).unwrap_or(false);
    refresh();
    done
}

#[wasm_bindgen]
pub fn toggle_theme() {
    with_app(|app| app.game.toggle_theme());
    refresh();
}

/// Let the host report connection changes it initiated itself.
#[wasm_bindgen]
pub fn set_wallet_address(address: Option<String>) {
    with_app(|app| match address {
        Some(a) => app.game.set_wallet_connected(a),
        None => app.game.set_wallet_disconnected(),
    });
    refresh();
}

#[wasm_bindgen]
pub fn connect_wallet() {
    let Some(wallet) = with_app(|app| app.wallet.clone()) else {
        return;
    };
    spawn_local(async move {
        match wallet.connect().await {
            Ok(value) => {
                let address = js_sys::Reflect::get(&value, &JsValue::from_str("address"))
                    .ok()
                    .and_then(|v| v.as_string());
                match address {
                    Some(a) => {
                        log::info!("wallet connected");
                        with_app(|app| app.game.set_wallet_connected(a));
                    }
                    None => log::warn!("wallet connect returned no address"),
                }
            }
            Err(e) => log::warn!("wallet connect failed: {e:?}"),
        }
        refresh();
    });
}

/// "Pay and continue": connects first if needed, otherwise submits the transaction.
#[wasm_bindgen]
pub fn pay_and_continue() {
    let Some((action, wallet)) = with_app(|app| (app.game.pay_and_continue(), app.wallet.clone()))
    else {
        return;
    };
    match action {
        PaymentAction::None => {}
        PaymentAction::Connect => connect_wallet(),
        PaymentAction::Send(request) => {
            refresh();
            spawn_local(async move {
                let result = submit(&wallet, &request).await;
                with_app(|app| app.game.transaction_settled(result));
                refresh();
            });
        }
    }
}

async fn submit(wallet: &WalletBridge, request: &TxRequest) -> Result<String, WalletError> {
    let payload = serde_wasm_bindgen::to_value(request)
        .map_err(|e| WalletError::Rejected(e.to_string()))?;
    let response = wallet
        .send_transaction(payload)
        .await
        .map_err(|e| WalletError::Rejected(describe_js_error(&e)))?;
    js_sys::Reflect::get(&response, &JsValue::from_str("transactionHash"))
        .ok()
        .and_then(|v| v.as_string())
        .filter(|h| !h.is_empty())
        .ok_or(WalletError::MissingHash)
}

fn describe_js_error(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    js_sys::Reflect::get(e, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{e:?}"))
}

/// Route a click on a rendered control.
fn dispatch(action: &str, index: Option<usize>) {
    match (action, index) {
        ("select", Some(i)) => select_card(i),
        ("answer", Some(i)) => {
            answer_quiz(i);
        }
        ("hint", _) => {
            use_hint();
        }
        ("dismiss-lesson", _) => dismiss_lesson(),
        ("show-lesson", _) => show_lesson(),
        ("pay", _) => pay_and_continue(),
        ("skip", _) => skip_transaction(),
        ("restart", _) => restart_game(),
        ("check-in", _) => {
            check_in();
        }
        ("theme", _) => toggle_theme(),
        ("connect", _) => connect_wallet(),
        (other, _) => log::debug!("unknown action {other}"),
    }
}
