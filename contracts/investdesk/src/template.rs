//! Mail templates with `[[shortcode]]` placeholders.
//!
//! The contract stores templates and publishes a `mail` event whenever a
//! notification is due; an off-chain mailer picks the event up, calls
//! `render_template` with the values it knows about the recipient and
//! sends the result.

use soroban_sdk::{log, Address, Env, Map, String, Symbol, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::storage;
use crate::types::{MailTemplate, RenderedMail};

pub const MAX_TEMPLATE_BYTES: usize = 2048;
pub const MAX_RENDERED_BYTES: usize = 4096;
const MAX_KEY_BYTES: usize = 32;
const MAX_VALUE_BYTES: usize = 256;

pub fn upsert_template(
    env: &Env,
    caller: Address,
    code: Symbol,
    name: String,
    subject: String,
    body: String,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    if subject.len() as usize > MAX_TEMPLATE_BYTES || body.len() as usize > MAX_TEMPLATE_BYTES {
        return Err(ContractError::TemplateTooLarge);
    }

    let enabled = match storage::get_template(env, &code) {
        Some(existing) => existing.enabled,
        None => {
            let mut codes = storage::get_template_codes(env);
            codes.push_back(code.clone());
            storage::set_template_codes(env, &codes);
            true
        }
    };

    let template = MailTemplate {
        code: code.clone(),
        name,
        subject,
        body,
        enabled,
        updated_at: env.ledger().timestamp(),
    };
    storage::set_template(env, &template);

    env.events()
        .publish((crate::symbol_short!("tpl_save"),), code);

    Ok(())
}

pub fn set_template_enabled(
    env: &Env,
    caller: Address,
    code: Symbol,
    enabled: bool,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut template = storage::get_template(env, &code).ok_or(ContractError::TemplateNotFound)?;
    template.enabled = enabled;
    storage::set_template(env, &template);

    env.events()
        .publish((crate::symbol_short!("tpl_state"),), (code, enabled));

    Ok(())
}

pub fn get_template(env: &Env, code: Symbol) -> Result<MailTemplate, ContractError> {
    storage::get_template(env, &code).ok_or(ContractError::TemplateNotFound)
}

pub fn get_template_codes(env: &Env) -> Vec<Symbol> {
    storage::get_template_codes(env)
}

pub fn render_template(
    env: &Env,
    code: Symbol,
    values: Map<String, String>,
) -> Result<RenderedMail, ContractError> {
    let template = get_template(env, code)?;

    let mut values = values;
    let site_key = String::from_str(env, "site_title");
    if !values.contains_key(site_key.clone()) {
        values.set(site_key, admin::get_settings(env)?.site_title);
    }

    Ok(RenderedMail {
        subject: render(env, &template.subject, &values)?,
        body: render(env, &template.body, &values)?,
    })
}

/// Publishes a `mail` event for `user` if the template exists and is on.
pub fn notify(env: &Env, code: Symbol, user: &Address) {
    match storage::get_template(env, &code) {
        Some(template) if template.enabled => {
            env.events()
                .publish((crate::symbol_short!("mail"), code), user.clone());
        }
        _ => log!(env, "mail skipped", code),
    }
}

/// Replaces every `[[key]]` in `text` that has an entry in `values`.
/// Unknown keys and an unterminated `[[` are copied as written.
pub fn render(
    env: &Env,
    text: &String,
    values: &Map<String, String>,
) -> Result<String, ContractError> {
    let len = text.len() as usize;
    if len > MAX_TEMPLATE_BYTES {
        return Err(ContractError::TemplateTooLarge);
    }
    let mut buf = [0u8; MAX_TEMPLATE_BYTES];
    text.copy_into_slice(&mut buf[..len]);
    let src = &buf[..len];

    let mut out = [0u8; MAX_RENDERED_BYTES];
    let mut n = 0usize;
    let mut i = 0usize;
    while i < len {
        if src[i] == b'[' && src.get(i + 1) == Some(&b'[') {
            if let Some(close) = find_close(src, i + 2) {
                if let Some(value) = lookup(env, values, &src[i + 2..close]) {
                    let value_len = value.len() as usize;
                    if value_len > MAX_VALUE_BYTES {
                        return Err(ContractError::TemplateTooLarge);
                    }
                    let mut value_buf = [0u8; MAX_VALUE_BYTES];
                    value.copy_into_slice(&mut value_buf[..value_len]);
                    push(&mut out, &mut n, &value_buf[..value_len])?;
                    i = close + 2;
                    continue;
                }
            }
        }
        push(&mut out, &mut n, &src[i..i + 1])?;
        i += 1;
    }

    let rendered = core::str::from_utf8(&out[..n]).map_err(|_| ContractError::MalformedTemplate)?;
    Ok(String::from_str(env, rendered))
}

fn find_close(src: &[u8], from: usize) -> Option<usize> {
    let limit = (from + MAX_KEY_BYTES).min(src.len().saturating_sub(1));
    (from..limit).find(|&j| src[j] == b']' && src[j + 1] == b']')
}

fn lookup(env: &Env, values: &Map<String, String>, key: &[u8]) -> Option<String> {
    let key = core::str::from_utf8(key).ok()?;
    if key.is_empty() {
        return None;
    }
    values.get(String::from_str(env, key))
}

fn push(out: &mut [u8], n: &mut usize, bytes: &[u8]) -> Result<(), ContractError> {
    let end = *n + bytes.len();
    if end > out.len() {
        return Err(ContractError::TemplateTooLarge);
    }
    out[*n..end].copy_from_slice(bytes);
    *n = end;
    Ok(())
}
