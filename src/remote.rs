use std::iter::FusedIterator;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use regex::Regex;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::archive::{ArchiveRef, Month, MonthRange};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{ArchivesResponse, Game, GamesResponse};

/// Where monthly archives come from.
///
/// Both calls perform exactly one request and never retry.
pub trait ArchiveSource {
    /// All archives published for `user`, oldest first.
    fn archive_list(&self, user: &str) -> Result<Vec<ArchiveRef>>;

    /// Games of one month, in the order the server returns them.
    fn fetch_games(&self, archive: &ArchiveRef) -> Result<Vec<Game>>;
}

/// Blocking client for the chess.com published-data API.
pub struct ChessComClient {
    http: Client,
    archives_url: String,
    games_url: String,
}

impl ChessComClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(Error::Client)?;
        Ok(Self {
            http,
            archives_url: cfg.archives_url.clone(),
            games_url: cfg.games_url.clone(),
        })
    }

    /// Reference to one month of `user`'s games, built from the games URL template.
    pub fn month_archive(&self, user: &str, year: i32, month: u32) -> Result<ArchiveRef> {
        let user = checked_user(user)?;
        let m = Month::new(year, month)?;
        let url = self
            .games_url
            .replace("{user}", user)
            .replace("{year}", &format!("{:04}", m.year()))
            .replace("{month}", &format!("{:02}", m.month()));
        ArchiveRef::parse(&url)
    }

    /// Games of a single month, addressed by year and month.
    pub fn month_games(&self, user: &str, year: i32, month: u32) -> Result<Vec<Game>> {
        let archive = self.month_archive(user, year, month)?;
        self.fetch_games(&archive)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("remote: GET {}", url);
        let t0 = Instant::now();
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|source| Error::RemoteUnreachable { host: host_of(url), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::RemoteRequest { status, url: url.to_string() });
        }

        let body = resp
            .json::<T>()
            .map_err(|source| Error::Decode { url: url.to_string(), source })?;
        debug!("remote: {} answered in {:.3}s", url, t0.elapsed().as_secs_f64());
        Ok(body)
    }
}

impl ArchiveSource for ChessComClient {
    fn archive_list(&self, user: &str) -> Result<Vec<ArchiveRef>> {
        let url = self.archives_url.replace("{user}", checked_user(user)?);
        let body: ArchivesResponse = self.get_json(&url)?;
        body.archives.iter().map(|u| ArchiveRef::parse(u)).collect()
    }

    fn fetch_games(&self, archive: &ArchiveRef) -> Result<Vec<Game>> {
        let body: GamesResponse = self.get_json(archive.url())?;
        Ok(body.games)
    }
}

/// chess.com usernames are ASCII letters, digits, `_` and `-`; anything else
/// would change the request path once substituted into a template.
fn checked_user(user: &str) -> Result<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));
    if re.is_match(user) {
        Ok(user)
    } else {
        Err(Error::InvalidUsername(user.to_string()))
    }
}

fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Lazy, single-pass walk over a list of archives: each `next()` fetches
/// exactly one month. The first error ends the stream.
pub struct ArchiveStream<'a, S: ArchiveSource + ?Sized> {
    source: &'a S,
    archives: Vec<ArchiveRef>,
    next: usize,
}

impl<'a, S: ArchiveSource + ?Sized> ArchiveStream<'a, S> {
    pub fn new(source: &'a S, archives: Vec<ArchiveRef>) -> Self {
        Self { source, archives, next: 0 }
    }

    /// The archives this stream walks, consumed or not.
    pub fn archives(&self) -> &[ArchiveRef] {
        &self.archives
    }

    pub fn remaining(&self) -> usize {
        self.archives.len() - self.next
    }
}

impl<S: ArchiveSource + ?Sized> Iterator for ArchiveStream<'_, S> {
    type Item = Result<Vec<Game>>;

    fn next(&mut self) -> Option<Self::Item> {
        let archive = self.archives.get(self.next)?;
        self.next += 1;

        match self.source.fetch_games(archive) {
            Ok(games) => {
                debug!("remote: {} -> {} games", archive.month(), games.len());
                Some(Ok(games))
            }
            Err(e) => {
                self.next = self.archives.len();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<S: ArchiveSource + ?Sized> FusedIterator for ArchiveStream<'_, S> {}

/// Resolve `user`'s archives, narrow them to `range`, and stream them lazily.
pub fn all_games<'a, S: ArchiveSource + ?Sized>(
    source: &'a S,
    user: &str,
    range: &MonthRange,
) -> Result<ArchiveStream<'a, S>> {
    let t0 = Instant::now();
    let mut archives = source.archive_list(user)?;
    info!(
        "remote: {} months available for {} ({:.3}s)",
        archives.len(),
        user,
        t0.elapsed().as_secs_f64()
    );

    if !range.is_unbounded() {
        let before = archives.len();
        archives = range.apply(&archives);
        info!("remote: filtered to {} months (was {})", archives.len(), before);
    }

    Ok(ArchiveStream::new(source, archives))
}

/// The archives a run will fetch, in fetch order, without fetching any.
///
/// With a timezone `switch` the window is split as for the switched run: the
/// months before the switch followed by the months after it. A switch on the
/// 1st lists that month twice, since both halves fetch it.
pub fn select_archives<S: ArchiveSource + ?Sized>(
    source: &S,
    user: &str,
    range: &MonthRange,
    switch: Option<NaiveDate>,
) -> Result<Vec<ArchiveRef>> {
    let archives = source.archive_list(user)?;
    let available = archives.len();
    let selected = match switch {
        Some(date) => {
            let (before, after) = range.split_at(date);
            let mut list = before.apply(&archives);
            list.extend(after.apply(&archives));
            list
        }
        None if range.is_unbounded() => archives,
        None => range.apply(&archives),
    };
    debug!("remote: {} of {} archives selected", selected.len(), available);
    Ok(selected)
}
