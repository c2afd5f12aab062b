use std::fmt;

use crate::error;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn next_value<T>(it: &mut std::slice::Iter<'_, std::string::String>, opt: &str) -> T
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .unwrap_or_else(|| error_exit(format!("{}: value missing", opt)));
    n.parse()
        .unwrap_or_else(|e| error_exit(format!("{}: {} '{}'", opt, e, n)))
}

pub fn unixtime_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64 / 1000.0)
        .unwrap_or(0.0)
}

pub fn error_exit<T: fmt::Display, U>(t: T) -> U {
    error!("{}", t);
    std::process::exit(1);
}

pub fn vec_count<T: PartialEq>(v: &[T], e: &T) -> usize {
    v.iter().filter(|&n| n == e).count()
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 重複を除いた要素を出現順に返却
pub fn vec_unique<T: PartialEq + Clone>(v: &[T]) -> Vec<T> {
    let mut res: Vec<T> = vec![];
    for e in v {
        if !res.contains(e) {
            res.push(e.clone());
        }
    }
    res
}

#[test]
fn test_vec_helpers() {
    assert_eq!(vec_count(&[1, 2, 1, 3], &1), 2);
    assert_eq!(vec_to_string(&[1, 2]), "[1, 2]");
    assert_eq!(vec_unique(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
}
