//! Ordered SoQL request parameters

use crate::api::constants;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteParams {
    pairs: Vec<(String, String)>,
}

impl RemoteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, replacing an earlier value for the same key in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encoded query string, keys in insertion order
    pub fn to_query_string(&self) -> String {
        encode_pairs(self.iter())
    }

    /// Resource URL for these parameters
    pub fn to_url(&self, base_url: &str, dataset_id: &str) -> String {
        with_query(constants::resource_endpoint(base_url, dataset_id), self.iter())
    }

    /// Resource URL without `$limit`, for opening the full result in a browser
    pub fn browser_url(&self, base_url: &str, dataset_id: &str) -> String {
        with_query(
            constants::resource_endpoint(base_url, dataset_id),
            self.iter().filter(|(k, _)| *k != constants::params::LIMIT),
        )
    }
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn with_query<'a>(mut url: String, pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let query = encode_pairs(pairs);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}
