use soroban_sdk::{Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::storage;
use crate::template;
use crate::types::{DataKey, HistoryKind, Ticket, TicketMessage, TicketPriority, TicketStatus};
use crate::user;

pub fn open_ticket(
    env: &Env,
    user: Address,
    title: String,
    message: String,
    priority: TicketPriority,
) -> Result<u64, ContractError> {
    user.require_auth();
    admin::require_feature(env, |s| s.tickets_enabled)?;
    user::require_active(env, &user)?;

    if title.len() == 0 || message.len() == 0 {
        return Err(ContractError::EmptyMessage);
    }

    let now = env.ledger().timestamp();
    let id = storage::next_id(env, &DataKey::TicketCounter);
    storage::set_ticket_message(
        env,
        id,
        0,
        &TicketMessage {
            author: user.clone(),
            from_admin: false,
            body: message,
            created_at: now,
        },
    );
    storage::set_ticket(
        env,
        &Ticket {
            id,
            user: user.clone(),
            title,
            priority,
            status: TicketStatus::Open,
            messages: 1,
            created_at: now,
            updated_at: now,
        },
    );
    storage::push_history(env, &user, HistoryKind::Tickets, id);
    storage::push_id(env, &DataKey::OpenTickets, id);

    env.events()
        .publish((crate::symbol_short!("tkt_open"), user), (id, priority));

    Ok(id)
}

/// Adds a message from the ticket owner or an admin. Staff replies mark
/// the ticket answered; owner replies put it back in the staff queue.
pub fn reply_ticket(
    env: &Env,
    author: Address,
    id: u64,
    message: String,
) -> Result<(), ContractError> {
    author.require_auth();

    let mut ticket = get_ticket(env, id)?;
    let from_admin = admin::is_admin(env, &author);
    if !from_admin && author != ticket.user {
        return Err(ContractError::Unauthorized);
    }
    if ticket.status == TicketStatus::Closed {
        return Err(ContractError::TicketClosed);
    }
    if message.len() == 0 {
        return Err(ContractError::EmptyMessage);
    }

    let now = env.ledger().timestamp();
    storage::set_ticket_message(
        env,
        id,
        ticket.messages,
        &TicketMessage {
            author: author.clone(),
            from_admin,
            body: message,
            created_at: now,
        },
    );
    ticket.messages += 1;
    ticket.updated_at = now;

    let was_open = ticket.status == TicketStatus::Open;
    if from_admin {
        ticket.status = TicketStatus::Answered;
        if was_open {
            storage::remove_id(env, &DataKey::OpenTickets, id);
        }
        template::notify(env, crate::symbol_short!("tkt_reply"), &ticket.user);
    } else {
        ticket.status = TicketStatus::Open;
        if !was_open {
            storage::push_id(env, &DataKey::OpenTickets, id);
        }
    }
    storage::set_ticket(env, &ticket);

    env.events()
        .publish((crate::symbol_short!("tkt_reply"), author), (id, ticket.messages));

    Ok(())
}

pub fn close_ticket(env: &Env, caller: Address, id: u64) -> Result<(), ContractError> {
    caller.require_auth();

    let mut ticket = get_ticket(env, id)?;
    if caller != ticket.user && !admin::is_admin(env, &caller) {
        return Err(ContractError::Unauthorized);
    }
    if ticket.status == TicketStatus::Closed {
        return Err(ContractError::TicketClosed);
    }
    if ticket.status == TicketStatus::Open {
        storage::remove_id(env, &DataKey::OpenTickets, id);
    }
    ticket.status = TicketStatus::Closed;
    ticket.updated_at = env.ledger().timestamp();
    storage::set_ticket(env, &ticket);

    env.events()
        .publish((crate::symbol_short!("tkt_close"),), (id, caller));

    Ok(())
}

pub fn reopen_ticket(env: &Env, caller: Address, id: u64) -> Result<(), ContractError> {
    caller.require_auth();

    let mut ticket = get_ticket(env, id)?;
    if caller != ticket.user && !admin::is_admin(env, &caller) {
        return Err(ContractError::Unauthorized);
    }
    if ticket.status != TicketStatus::Closed {
        return Err(ContractError::TicketNotClosed);
    }
    ticket.status = TicketStatus::Open;
    ticket.updated_at = env.ledger().timestamp();
    storage::set_ticket(env, &ticket);
    storage::push_id(env, &DataKey::OpenTickets, id);

    env.events()
        .publish((crate::symbol_short!("tkt_reopn"),), (id, caller));

    Ok(())
}

pub fn get_ticket(env: &Env, id: u64) -> Result<Ticket, ContractError> {
    storage::get_ticket(env, id).ok_or(ContractError::TicketNotFound)
}

pub fn get_ticket_messages(env: &Env, id: u64) -> Result<Vec<TicketMessage>, ContractError> {
    let ticket = get_ticket(env, id)?;
    let mut out = Vec::new(env);
    for index in 0..ticket.messages {
        if let Some(message) = storage::get_ticket_message(env, id, index) {
            out.push_back(message);
        }
    }
    Ok(out)
}

pub fn get_user_tickets(env: &Env, user: Address, start: u32, limit: u32) -> Vec<Ticket> {
    collect(
        env,
        storage::history_page(env, &user, HistoryKind::Tickets, start, limit),
    )
}

/// Tickets waiting on staff, oldest first.
pub fn get_open_tickets(env: &Env) -> Vec<Ticket> {
    collect(env, storage::get_ids(env, &DataKey::OpenTickets))
}

fn collect(env: &Env, ids: Vec<u64>) -> Vec<Ticket> {
    let mut out = Vec::new(env);
    for id in ids.iter() {
        if let Some(ticket) = storage::get_ticket(env, id) {
            out.push_back(ticket);
        }
    }
    out
}
