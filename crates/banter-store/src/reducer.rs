//! The fold from transition records into client state.
//!
//! `reduce` is a pure function of `(state, record)`. Each slice handles the
//! records it recognizes and hands back a pointer-identical value for the
//! rest, so an unrecognized record costs three root comparisons and no
//! allocation beyond the clones themselves.

use banter_model::{ChannelId, Post, PostId, PostLifecycle, PostList};

use crate::action::{Action, RequestPhase};
use crate::state::{
    ClientState, ErrorLogState, PostsState, RequestState, RequestStatus, RequestsState,
};

/// Fold one record into the state.
pub fn reduce(state: &ClientState, action: &Action) -> ClientState {
    ClientState {
        posts: reduce_posts(&state.posts, action),
        requests: reduce_requests(&state.requests, action),
        errors: reduce_errors(&state.errors, action),
    }
}

fn reduce_posts(state: &PostsState, action: &Action) -> PostsState {
    match action {
        Action::PostReceived { post } => post_received(state, post),
        Action::PostsReceived { channel_id, list } => posts_received(state, channel_id, list),
        Action::PostDeleted { post } => post_deleted(state, post),
        Action::PostRemoved { post } => post_removed(state, post),
        Action::PostSelected { post_id } => {
            let mut next = state.clone();
            next.selected_post_id = post_id.clone();
            next
        }
        Action::PostFocused { post_id } => {
            let mut next = state.clone();
            next.current_focused_post_id = post_id.clone();
            next
        }
        Action::LoggedOut => PostsState::default(),
        _ => state.clone(),
    }
}

/// Singular receive: rewrite the cached copy unconditionally, and prepend the
/// id to its channel order when the channel has not seen it yet. A post this
/// client just created is almost always the newest in its channel, so the
/// prepend lands it in the right place without a sort; an out-of-order
/// arrival stays misplaced until the next page fetch re-sorts the channel.
fn post_received(state: &PostsState, post: &Post) -> PostsState {
    let mut next = state.clone();
    next.posts.insert(post.id.clone(), post.clone());

    let already_ordered = state
        .posts_by_channel
        .get(&post.channel_id)
        .is_some_and(|order| order.contains(&post.id));
    if !already_ordered {
        let mut order = state
            .posts_by_channel
            .get(&post.channel_id)
            .cloned()
            .unwrap_or_default();
        order.push_front(post.id.clone());
        next.posts_by_channel.insert(post.channel_id.clone(), order);
    }
    next
}

/// Batch receive: merge every live post, append ids the channel order is
/// missing, then re-sort the whole order. This path is authoritative for
/// ordering.
fn posts_received(state: &PostsState, channel_id: &ChannelId, list: &PostList) -> PostsState {
    let mut next = state.clone();
    let mut order = state
        .posts_by_channel
        .get(channel_id)
        .cloned()
        .unwrap_or_default();

    for incoming in list.posts.values() {
        // Posts already deleted at the server never enter the cache through
        // this path; a placeholder for them comes from an explicit deletion
        // record instead.
        if incoming.is_server_deleted() {
            continue;
        }

        // Longstanding quirk kept on purpose: the cache is rewritten only
        // when the cached stamp is strictly newer than the incoming one, so
        // a stale page clobbers fresh local edits and equal stamps keep the
        // cached copy. The stamp direction matches the servers this client
        // already talks to, so replays fold identically.
        let replace = match next.posts.get(&incoming.id) {
            None => true,
            Some(cached) => cached.update_at > incoming.update_at,
        };
        if replace {
            next.posts.insert(incoming.id.clone(), incoming.clone());
        }

        if !order.contains(&incoming.id) {
            order.push_back(incoming.id.clone());
        }
    }

    // Stable sort, newest first; ties keep their existing relative order so
    // replaying the same page cannot shuffle the channel.
    let mut sorted: Vec<PostId> = order.iter().cloned().collect();
    sorted.sort_by_key(|id| {
        std::cmp::Reverse(next.posts.get(id).map_or(0, |post| post.create_at))
    });
    next.posts_by_channel
        .insert(channel_id.clone(), sorted.into_iter().collect());

    next
}

/// Soft deletion: the cached copy becomes a placeholder with its content
/// stripped, and the channel order is left alone so the placeholder keeps
/// its position. Unknown ids are a no-op.
fn post_deleted(state: &PostsState, post: &Post) -> PostsState {
    let Some(cached) = state.posts.get(&post.id) else {
        return state.clone();
    };

    let mut placeholder = cached.clone();
    placeholder.state = PostLifecycle::Deleted;
    placeholder.message = String::new();
    placeholder.file_ids = Vec::new();
    placeholder.has_reactions = false;

    let mut next = state.clone();
    next.posts.insert(post.id.clone(), placeholder);
    next
}

/// Physical removal: drop the post from the cache and its channel order,
/// then drop every comment in the same channel rooted at it. Unknown ids are
/// a no-op.
fn post_removed(state: &PostsState, post: &Post) -> PostsState {
    if !state.posts.contains_key(&post.id) {
        return state.clone();
    }

    let mut next = state.clone();
    next.posts.remove(&post.id);

    let mut order = state
        .posts_by_channel
        .get(&post.channel_id)
        .cloned()
        .unwrap_or_default();
    if let Some(index) = order.index_of(&post.id) {
        order.remove(index);
    }

    let comment_ids: Vec<PostId> = order
        .iter()
        .filter(|id| {
            next.posts
                .get(id)
                .is_some_and(|candidate| candidate.root_id == post.id)
        })
        .cloned()
        .collect();
    for id in &comment_ids {
        next.posts.remove(id);
        if let Some(index) = order.index_of(id) {
            order.remove(index);
        }
    }

    next.posts_by_channel.insert(post.channel_id.clone(), order);
    next
}

fn reduce_requests(state: &RequestsState, action: &Action) -> RequestsState {
    match action {
        Action::Request { op, phase } => {
            let entry = match phase {
                RequestPhase::Started => RequestState {
                    status: RequestStatus::InProgress,
                    error: None,
                },
                RequestPhase::Succeeded => RequestState {
                    status: RequestStatus::Success,
                    error: None,
                },
                RequestPhase::Failed(error) => RequestState {
                    status: RequestStatus::Failure,
                    error: Some(error.clone()),
                },
            };
            state.with_entry(*op, entry)
        }
        Action::LoggedOut => RequestsState::default(),
        _ => state.clone(),
    }
}

fn reduce_errors(state: &ErrorLogState, action: &Action) -> ErrorLogState {
    match action {
        Action::ErrorLogged { entry } => state.with_entry(entry.clone()),
        Action::LoggedOut => ErrorLogState::default(),
        _ => state.clone(),
    }
}
