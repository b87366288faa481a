//! Randomized record scripts checking the replica's structural guarantees.
//!
//! Ids are drawn from a small pool and each id maps to a fixed channel, the
//! way real traffic behaves: a post never migrates between channels.

use banter_model::{ChannelId, Post, PostId, PostList};
use banter_store::{Action, ClientState, reduce};
use quickcheck::{Arbitrary, Gen, quickcheck};

fn post_id(id: u8) -> PostId {
    PostId::from(format!("post-{id:02}"))
}

fn channel_of(id: u8) -> ChannelId {
    ChannelId::from(if id % 2 == 0 { "alpha" } else { "beta" })
}

#[derive(Debug, Clone)]
struct PostSeed {
    id: u8,
    create_at: u8,
    update_at: u8,
    reply: bool,
    deleted: bool,
}

impl PostSeed {
    fn materialize(&self) -> Post {
        let id = self.id % 16;
        Post {
            id: post_id(id),
            channel_id: channel_of(id),
            // Replies point two ids down, which stays inside the same
            // channel because channels are keyed by id parity.
            root_id: if self.reply && id >= 2 {
                post_id(id - 2)
            } else {
                PostId::default()
            },
            create_at: i64::from(self.create_at),
            update_at: i64::from(self.update_at),
            delete_at: if self.deleted { 1 } else { 0 },
            message: format!("message {id}"),
            ..Post::default()
        }
    }
}

impl Arbitrary for PostSeed {
    fn arbitrary(g: &mut Gen) -> Self {
        PostSeed {
            id: u8::arbitrary(g) % 16,
            create_at: u8::arbitrary(g),
            update_at: u8::arbitrary(g),
            reply: bool::arbitrary(g),
            // Skewed towards live posts; deleted ones only matter for the
            // batch skip path.
            deleted: bool::arbitrary(g) && bool::arbitrary(g),
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Batch { parity: u8, posts: Vec<PostSeed> },
    Single(PostSeed),
    SoftDelete(u8),
    Remove(u8),
}

/// Forces every id in the batch onto the batch's channel.
fn batch_step(parity: u8, mut posts: Vec<PostSeed>) -> Step {
    let parity = parity % 2;
    for seed in &mut posts {
        seed.id = (seed.id % 16) - (seed.id % 16 % 2) + parity;
    }
    Step::Batch { parity, posts }
}

impl Step {
    fn into_action(self) -> Action {
        match self {
            Step::Batch { parity, posts } => {
                let materialized: Vec<Post> =
                    posts.iter().map(PostSeed::materialize).collect();
                let order = materialized.iter().map(|p| p.id.clone()).collect();
                let posts = materialized
                    .into_iter()
                    .map(|p| (p.id.clone(), p))
                    .collect();
                Action::PostsReceived {
                    channel_id: channel_of(parity),
                    list: PostList { posts, order },
                }
            }
            Step::Single(seed) => Action::PostReceived { post: seed.materialize() },
            Step::SoftDelete(id) => Action::PostDeleted {
                post: Post {
                    id: post_id(id % 16),
                    channel_id: channel_of(id % 16),
                    ..Post::default()
                },
            },
            Step::Remove(id) => Action::PostRemoved {
                post: Post {
                    id: post_id(id % 16),
                    channel_id: channel_of(id % 16),
                    ..Post::default()
                },
            },
        }
    }
}

impl Arbitrary for Step {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 => {
                let mut posts = Vec::new();
                for _ in 0..(usize::arbitrary(g) % 6) {
                    posts.push(PostSeed::arbitrary(g));
                }
                batch_step(u8::arbitrary(g), posts)
            }
            1 => Step::Single(PostSeed::arbitrary(g)),
            2 => Step::SoftDelete(u8::arbitrary(g) % 16),
            _ => Step::Remove(u8::arbitrary(g) % 16),
        }
    }
}

fn final_state(script: Vec<Step>) -> ClientState {
    script.into_iter().fold(ClientState::default(), |state, step| {
        reduce(&state, &step.into_action())
    })
}

quickcheck! {
    fn ordered_ids_always_resolve(script: Vec<Step>) -> bool {
        let state = final_state(script);
        state.posts.posts_by_channel.iter().all(|(_, order)| {
            order.iter().all(|id| state.posts.get(id).is_some())
        })
    }

    fn channel_orders_never_duplicate(script: Vec<Step>) -> bool {
        let state = final_state(script);
        state.posts.posts_by_channel.iter().all(|(_, order)| {
            let mut seen = std::collections::HashSet::new();
            order.iter().all(|id| seen.insert(id.clone()))
        })
    }

    fn batches_leave_every_channel_sorted(script: Vec<Step>) -> bool {
        // Ordering is only authoritative on the batch path; singular
        // receives may park a post out of order on purpose.
        let batches: Vec<Step> = script
            .into_iter()
            .filter(|step| matches!(step, Step::Batch { .. }))
            .collect();
        let state = final_state(batches);
        state.posts.posts_by_channel.iter().all(|(_, order)| {
            order
                .iter()
                .map(|id| state.posts.get(id).map_or(0, |p| p.create_at))
                .is_sorted_by(|a, b| a >= b)
        })
    }

    fn replaying_a_batch_is_idempotent(script: Vec<Step>, parity: u8, posts: Vec<PostSeed>) -> bool {
        let base = final_state(script);
        let action = batch_step(parity, posts).into_action();
        let once = reduce(&base, &action);
        let twice = reduce(&once, &action);
        once == twice
    }

    fn soft_delete_never_touches_order(script: Vec<Step>, id: u8) -> bool {
        let base = final_state(script);
        let next = reduce(&base, &Step::SoftDelete(id).into_action());
        next.posts.posts_by_channel == base.posts.posts_by_channel
    }
}
