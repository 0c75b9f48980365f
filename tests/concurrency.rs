use std::sync::Arc;
use std::thread;

use jel::{EvaluationContext, Expression};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn expression_shared_between_threads() {
    let expr = Arc::new(
        Expression::parse("items.?[#this % 2 == 0].![#this * #root.factor]").unwrap(),
    );

    let handles: Vec<_> = (1..=8)
        .map(|factor| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || {
                let doc = json!({ "items": [1, 2, 3, 4, 5, 6], "factor": factor });
                (factor, expr.evaluate(&doc).unwrap())
            })
        })
        .collect();

    for handle in handles {
        let (factor, scaled) = handle.join().unwrap();
        assert_eq!(scaled, json!([2 * factor, 4 * factor, 6 * factor]));
    }
}

#[test]
fn context_per_thread_with_host_function() {
    let expr = Arc::new(Expression::parse("#tag(name)").unwrap());

    let handles: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|prefix| {
            let expr = Arc::clone(&expr);
            thread::spawn(move || {
                let doc = json!({ "name": "x" });
                let mut ctx = EvaluationContext::new(&doc);
                ctx.register_function("tag", 1, move |args| {
                    Ok(json!(format!("{prefix}:{}", args[0].as_str().unwrap_or_default())))
                });
                let result = expr.evaluate_in(&mut ctx).unwrap();
                assert_eq!(ctx.depth(), 0);
                result
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![json!("a:x"), json!("b:x"), json!("c:x")]);
}

#[test]
fn cloned_expression_evaluates_independently() {
    let expr = Expression::parse("#join(words.![#upper(#this)], ' ')").unwrap();
    let docs = [
        json!({ "words": ["a", "b"] }),
        json!({ "words": ["rust"] }),
        json!({ "words": [] }),
    ];

    let results: Vec<_> = thread::scope(|scope| {
        docs.iter()
            .map(|doc| {
                let expr = expr.clone();
                scope.spawn(move || expr.evaluate(doc).unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(results, vec![json!("A B"), json!("RUST"), json!("")]);
}
