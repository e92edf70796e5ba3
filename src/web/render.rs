// DOM rendering for the browser build.
// The whole view is regenerated from a GameSnapshot on every change; clicks
// are caught by one delegated listener on the root and routed by the
// `data-action` / `data-index` attributes of the nearest control.
use std::cell::RefCell;
use std::fmt::Write as _;

use html_escape::encode_text;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};

use crate::game::{GameSnapshot, Phase};
use crate::storage::Theme;
use crate::wallet::{TxStatus, short_address};

type ClickHandler = Closure<dyn FnMut(MouseEvent)>;

thread_local! {
    static CLICK_HANDLER: RefCell<Option<ClickHandler>> = const { RefCell::new(None) };
}

pub(super) fn install_click_listener(root: &Element) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
        let Some(target) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(control)) = target.closest("[data-action]") else {
            return;
        };
        if control.has_attribute("disabled") {
            return;
        }
        let Some(action) = control.get_attribute("data-action") else {
            return;
        };
        let index = control
            .get_attribute("data-index")
            .and_then(|raw| raw.parse::<usize>().ok());
        super::dispatch(&action, index);
    }) as Box<dyn FnMut(_)>);
    root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    CLICK_HANDLER.with(|h| h.replace(Some(closure)));
    Ok(())
}

pub(super) fn remove_click_listener(root: &Element) {
    if let Some(closure) = CLICK_HANDLER.with(|h| h.borrow_mut().take()) {
        root.remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .ok();
    }
}

pub(super) fn render(root: &Element, snap: &GameSnapshot) -> Result<(), JsValue> {
    root.set_attribute("data-theme", snap.theme.as_str())?;
    root.set_class_name("mm-root");
    let mut html = String::with_capacity(4096);
    header(&mut html, snap);
    board(&mut html, snap);
    match snap.phase {
        Phase::Lesson => lesson_modal(&mut html, snap),
        Phase::Quiz => quiz_modal(&mut html, snap),
        Phase::TransactionGate => transaction_modal(&mut html, snap),
        Phase::Complete => complete_modal(&mut html, snap),
        Phase::Board => {}
    }
    root.set_inner_html(&html);
    Ok(())
}

fn button(html: &mut String, action: &str, index: Option<usize>, label: &str, disabled: bool) {
    let _ = write!(html, "<button class=\"mm-btn\" data-action=\"{action}\"");
    if let Some(i) = index {
        let _ = write!(html, " data-index=\"{i}\"");
    }
    if disabled {
        html.push_str(" disabled");
    }
    let _ = write!(html, ">{}</button>", encode_text(label));
}

fn header(html: &mut String, snap: &GameSnapshot) {
    let _ = write!(
        html,
        "<header class=\"mm-header\"><span>Level {}/{} · {}</span><span>Score {}</span><span>Hints {}</span><span>Streak {}</span>",
        snap.level,
        snap.last_level,
        encode_text(&snap.level_theme),
        snap.score,
        snap.hints,
        snap.streak,
    );
    if snap.check_in_available {
        button(html, "check-in", None, "Daily check-in", false);
    }
    let theme_label = match snap.theme {
        Theme::Dark => "Light mode",
        Theme::Light => "Dark mode",
    };
    button(html, "theme", None, theme_label, false);
    match &snap.wallet_display {
        Some(addr) => {
            let _ = write!(html, "<span class=\"mm-wallet\">{}</span>", encode_text(addr));
        }
        None => button(html, "connect", None, "Connect wallet", false),
    }
    html.push_str("</header>");
}

fn board(html: &mut String, snap: &GameSnapshot) {
    let _ = write!(
        html,
        "<section class=\"mm-board\" data-pairs=\"{}\">",
        snap.total_pairs
    );
    for (i, card) in snap.cards.iter().enumerate() {
        let mut class = String::from("mm-card");
        if card.flipped {
            class.push_str(" flipped");
        }
        if card.matched {
            class.push_str(" matched");
        }
        let face = if card.flipped || card.matched {
            encode_text(&card.text).into_owned()
        } else {
            "?".to_string()
        };
        let _ = write!(
            html,
            "<button class=\"{class}\" data-action=\"select\" data-index=\"{i}\">{face}</button>"
        );
    }
    html.push_str("</section><footer class=\"mm-footer\">");
    let _ = write!(
        html,
        "<span>{}/{} pairs</span>",
        snap.matched_pairs, snap.total_pairs
    );
    let board_live = snap.phase == Phase::Board;
    button(
        html,
        "hint",
        None,
        &format!("Hint ({})", snap.hints),
        !board_live || snap.hints == 0 || !snap.pending.is_empty(),
    );
    button(html, "show-lesson", None, "Lesson", !board_live);
    html.push_str("</footer>");
}

fn modal_open(html: &mut String, title: &str) {
    let _ = write!(
        html,
        "<div class=\"mm-modal\"><div class=\"mm-dialog\"><h2>{}</h2>",
        encode_text(title)
    );
}

fn modal_close(html: &mut String) {
    html.push_str("</div></div>");
}

fn lesson_modal(html: &mut String, snap: &GameSnapshot) {
    modal_open(html, &snap.level_theme);
    let _ = write!(html, "<p>{}</p>", encode_text(&snap.lesson));
    button(html, "dismiss-lesson", None, "Start matching", false);
    modal_close(html);
}

fn quiz_modal(html: &mut String, snap: &GameSnapshot) {
    let Some(quiz) = &snap.quiz else {
        return;
    };
    modal_open(html, "Quiz");
    let _ = write!(html, "<p>{}</p>", encode_text(&quiz.question));
    for (i, option) in quiz.options.iter().enumerate() {
        button(html, "answer", Some(i), option, false);
    }
    modal_close(html);
}

fn transaction_modal(html: &mut String, snap: &GameSnapshot) {
    modal_open(html, "Unlock the next level");
    let busy = matches!(snap.tx, TxStatus::Loading | TxStatus::Success(_));
    match &snap.tx {
        TxStatus::Idle => {
            html.push_str("<p>Send a tiny transaction on Base for a +1000 bonus, or skip.</p>")
        }
        TxStatus::Loading => html.push_str("<p>Waiting for your wallet…</p>"),
        TxStatus::Success(hash) => {
            let _ = write!(
                html,
                "<p>Confirmed {}. Next level coming up.</p>",
                encode_text(&short_address(hash))
            );
        }
        TxStatus::Error(message) => {
            let _ = write!(
                html,
                "<p class=\"mm-error\">Transaction failed: {}</p>",
                encode_text(message)
            );
        }
    }
    let pay_label = match (&snap.tx, snap.wallet_connected) {
        (TxStatus::Error(_), _) => "Retry payment",
        (_, false) => "Connect wallet",
        _ => "Pay and continue",
    };
    button(html, "pay", None, pay_label, busy);
    button(html, "skip", None, "Skip and continue", busy);
    modal_close(html);
}

fn complete_modal(html: &mut String, snap: &GameSnapshot) {
    modal_open(html, "All levels complete!");
    let _ = write!(
        html,
        "<p>Final score {}</p><p>Quizzes solved {}</p><p>Check-in streak {}</p>",
        snap.score, snap.quizzes_solved, snap.streak
    );
    button(html, "restart", None, "Play again", false);
    modal_close(html);
}
