// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector engine.
//!
//! ## Supported syntax
//!
//! - Type (`div`, case-insensitive), universal (`*`), id (`#main`) and class (`.card`)
//!   selectors, combined into compounds such as `li.item.active`.
//! - Descendant (whitespace) and child (`>`) combinators.
//! - Comma-separated selector lists.
//!
//! Attribute selectors, pseudo-classes, and sibling combinators are rejected with
//! [`SelectorError::Unexpected`].
//!
//! ```
//! use rollover_dom::selector::{SelectorError, SelectorList};
//!
//! assert!(SelectorList::parse("ul > li.item, #footer a").is_ok());
//! assert_eq!(SelectorList::parse("  "), Err(SelectorError::Empty));
//! assert_eq!(
//!     SelectorList::parse("a:hover"),
//!     Err(SelectorError::Unexpected { ch: ':', offset: 1 })
//! );
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::types::Element;

/// Errors from [`SelectorList::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector was empty or only whitespace.
    #[error("empty selector")]
    Empty,
    /// The selector ended where a compound selector was expected.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    /// A character that is not part of the supported syntax.
    #[error("unexpected {ch:?} at offset {offset}")]
    Unexpected {
        /// The offending character.
        ch: char,
        /// Byte offset of `ch` in the input.
        offset: usize,
    },
    /// A `>` combinator without a compound selector on one side.
    #[error("combinator is missing an operand")]
    DanglingCombinator,
}

/// Read access to the element data selectors match against.
pub(crate) trait MatchContext {
    fn local_name(&self, el: Element) -> Option<&str>;
    fn id(&self, el: Element) -> Option<&str>;
    fn has_class(&self, el: Element, class: &str) -> bool;
    fn parent(&self, el: Element) -> Option<Element>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    // `None` is the universal selector.
    local_name: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: Element, cx: &impl MatchContext) -> bool {
        if let Some(name) = &self.local_name
            && cx.local_name(el) != Some(name.as_str())
        {
            return false;
        }
        if let Some(id) = &self.id
            && cx.id(el) != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| cx.has_class(el, c))
    }
}

/// Compounds joined by combinators. The combinator stored with part `i` relates it to
/// part `i - 1`; the first part's combinator is unused.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, el: Element, cx: &impl MatchContext) -> bool {
        self.matches_at(self.parts.len() - 1, el, cx)
    }

    fn matches_at(&self, idx: usize, el: Element, cx: &impl MatchContext) -> bool {
        let (combinator, compound) = &self.parts[idx];
        if !compound.matches(el, cx) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => cx
                .parent(el)
                .is_some_and(|p| self.matches_at(idx - 1, p, cx)),
            Combinator::Descendant => {
                let mut cur = cx.parent(el);
                while let Some(p) = cur {
                    if self.matches_at(idx - 1, p, cx) {
                        return true;
                    }
                    cur = cx.parent(p);
                }
                false
            }
        }
    }
}

/// A parsed, comma-separated selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse `input`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { src: input, pos: 0 };
        let mut selectors = Vec::new();
        loop {
            selectors.push(parser.complex()?);
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                }
                Some(ch) => {
                    return Err(SelectorError::Unexpected {
                        ch,
                        offset: parser.pos,
                    });
                }
            }
        }
        Ok(Self { selectors })
    }

    /// Number of comma-separated selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Always false for a successfully parsed list.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub(crate) fn matches(&self, el: Element, cx: &impl MatchContext) -> bool {
        self.selectors.iter().any(|s| s.matches(el, cx))
    }
}

impl core::str::FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        (self.pos != start).then(|| &self.src[start..self.pos])
    }

    fn expected_compound(&self, after_combinator: bool) -> SelectorError {
        match self.peek() {
            None if after_combinator => SelectorError::DanglingCombinator,
            None => SelectorError::UnexpectedEnd,
            Some('>') => SelectorError::DanglingCombinator,
            Some(ch) => SelectorError::Unexpected {
                ch,
                offset: self.pos,
            },
        }
    }

    fn compound(&mut self) -> Result<Option<Compound>, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;
        if self.peek() == Some('*') {
            self.bump();
            any = true;
        } else if let Some(name) = self.ident() {
            compound.local_name = Some(name.to_ascii_lowercase());
            any = true;
        }
        loop {
            let sigil = match self.peek() {
                Some(c @ ('#' | '.')) => c,
                _ => break,
            };
            self.bump();
            let Some(name) = self.ident() else {
                return Err(self.expected_compound(false));
            };
            if sigil == '#' {
                compound.id = Some(name.to_string());
            } else {
                compound.classes.push(name.to_string());
            }
            any = true;
        }
        Ok(any.then_some(compound))
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let first = self.compound()?.ok_or_else(|| self.expected_compound(false))?;
        let mut parts = alloc::vec![(Combinator::Descendant, first)];
        loop {
            let spaced = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    let next = self
                        .compound()?
                        .ok_or_else(|| self.expected_compound(true))?;
                    parts.push((Combinator::Child, next));
                }
                Some(_) if spaced => {
                    let next = self
                        .compound()?
                        .ok_or_else(|| self.expected_compound(false))?;
                    parts.push((Combinator::Descendant, next));
                }
                Some(ch) => {
                    return Err(SelectorError::Unexpected {
                        ch,
                        offset: self.pos,
                    });
                }
            }
        }
        Ok(Complex { parts })
    }
}
