use super::*;
use crate::now_unix_s;
use tempfile::TempDir;

fn test_store() -> (ScoreStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = ScoreStore::open(dir.path()).unwrap();
    (store, dir)
}

#[test]
fn empty_store_lists_nothing() {
    let (store, _dir) = test_store();
    assert!(store.top(10).unwrap().is_empty());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn insert_returns_increasing_ids() {
    let (store, _dir) = test_store();
    let first = store.insert("alice", 120, now_unix_s()).unwrap();
    let second = store.insert("bob", 80, now_unix_s()).unwrap();
    assert!(second > first);
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn top_orders_by_score_then_age() {
    let (store, _dir) = test_store();
    let now = now_unix_s();
    store.insert("low", 10, now).unwrap();
    let early = store.insert("tie-early", 500, now).unwrap();
    let late = store.insert("tie-late", 500, now).unwrap();
    store.insert("mid", 250, now).unwrap();

    let top = store.top(10).unwrap();
    let names: Vec<&str> = top.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, vec!["tie-early", "tie-late", "mid", "low"]);
    assert_eq!(top[0].id, early);
    assert_eq!(top[1].id, late);
}

#[test]
fn top_respects_limit() {
    let (store, _dir) = test_store();
    for score in 0..15 {
        store.insert(&format!("p{score}"), score, now_unix_s()).unwrap();
    }
    let top = store.top(10).unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].score, 14);
    assert_eq!(top[9].score, 5);
}

#[test]
fn negative_scores_violate_the_schema() {
    let (store, _dir) = test_store();
    let err = store.insert("cheater", -1, now_unix_s()).unwrap_err();
    assert!(err.contains("insert score failed"), "{err}");
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn scores_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = ScoreStore::open(dir.path()).unwrap();
        store.insert("持久", 42, now_unix_s()).unwrap();
    }
    let store = ScoreStore::open(dir.path()).unwrap();
    let top = store.top(10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_name, "持久");
    assert_eq!(top[0].score, 42);
}
