//! The scan driver.
//!
//! A scan walks the input with the combined matcher of the innermost open
//! rule. Text between matches is collected in a buffer which is classified
//! (keywords or a sub-language) whenever a rule opens or closes.

use std::{collections::HashMap, sync::Arc};

use log::{debug, trace};

use crate::{
    compile::{Grammar, MatchType, Rule, RuleId},
    def::{BeginGuard, EndGuard, SubLanguage},
    error::HighlightError,
    highlighter::Highlighter,
    matcher::{anchored_regex, next_char_boundary, RegexMatch},
    render::HtmlRenderer,
    result::{Continuation, Frame, HighlightResult, IllegalBy},
    tree::TokenTree,
};

/// Sub-languages may delegate further, auto-detected ones even to themselves.
const MAX_SUBLANGUAGE_DEPTH: usize = 8;
const MAX_ITERATIONS: usize = 100_000;
/// Open rules per scan, the root included.
const MAX_NESTING: usize = 1_000;
/// Bytes of input reported on either side of an illegal lexeme.
const CONTEXT_BYTES: usize = 100;

pub(crate) struct ScanRequest<'a> {
    pub language: &'a str,
    pub grammar: &'a Arc<Grammar>,
    pub code: &'a str,
    pub ignore_illegals: bool,
    pub continuation: Option<&'a Continuation>,
    pub depth: usize,
}

/// Runs a scan, applying the safe mode fault policy.
pub(crate) fn highlight_grammar(
    highlighter: &Highlighter,
    request: ScanRequest<'_>,
) -> Result<HighlightResult, HighlightError> {
    let safe_mode = highlighter.options().safe_mode;
    let code = request.code;
    let language = request.language;

    let mut scanner = Scanner::new(highlighter, &request);
    let error = match scanner.run() {
        Ok(()) => return Ok(scanner.finish()),
        Err(error) => error,
    };

    if !safe_mode {
        return Err(error);
    }

    let mut result = HighlightResult::plain(code, Some(language.to_owned()));
    result.illegal = true;
    match &error {
        HighlightError::Illegal { mode, context, .. } => {
            result.illegal_by = Some(IllegalBy {
                message: error.to_string(),
                context: context.clone(),
                mode: Some(mode.clone()),
            });
        }
        _ => {
            debug!("swallowed fault while highlighting `{language}`: {error}");
            result.error_raised = Some(error);
        }
    }
    Ok(result)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn context_around(code: &str, index: usize) -> String {
    let start = floor_char_boundary(code, index.saturating_sub(CONTEXT_BYTES));
    let end = floor_char_boundary(code, (index + CONTEXT_BYTES).min(code.len()));
    code[start..end].to_owned()
}

struct Scanner<'a> {
    highlighter: &'a Highlighter,
    language: &'a str,
    grammar: &'a Arc<Grammar>,
    code: &'a str,
    ignore_illegals: bool,
    safe_mode: bool,
    depth: usize,

    frames: Vec<Frame>,
    tree: TokenTree,
    buffer: String,
    relevance: u32,
    index: usize,
    iterations: usize,
    /// Kind and offset of the previous match.
    last_match: Option<(MatchType, usize)>,
    /// The previous begin match was rejected, retry the remaining alternatives.
    resume: bool,
    regex_index: usize,
    /// Where each single-language delegation left off.
    continuations: HashMap<String, Continuation>,
}

impl<'a> Scanner<'a> {
    fn new(highlighter: &'a Highlighter, request: &ScanRequest<'a>) -> Scanner<'a> {
        let grammar = request.grammar;
        let frames = match request.continuation {
            Some(c) if Arc::ptr_eq(&c.grammar, grammar) && !c.frames.is_empty() => c.frames.clone(),
            _ => vec![Frame::new(grammar.root())],
        };

        let mut tree = TokenTree::new();
        for frame in &frames[1..] {
            if let Some(scope) = &grammar.rule(frame.rule).scope {
                tree.open_node(scope);
            }
        }

        Scanner {
            highlighter,
            language: request.language,
            grammar,
            code: request.code,
            ignore_illegals: request.ignore_illegals,
            safe_mode: highlighter.options().safe_mode,
            depth: request.depth,
            frames,
            tree,
            buffer: String::new(),
            relevance: 0,
            index: 0,
            iterations: 0,
            last_match: None,
            resume: false,
            regex_index: 0,
            continuations: HashMap::new(),
        }
    }

    fn top(&self) -> &Frame {
        // the root frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    fn top_rule(&self) -> &'a Rule {
        let grammar: &'a Grammar = self.grammar;
        grammar.rule(self.top().rule)
    }

    fn run(&mut self) -> Result<(), HighlightError> {
        let code = self.code;
        loop {
            self.iterations += 1;
            if self.resume {
                self.resume = false;
            } else {
                self.regex_index = 0;
            }
            if self.index > code.len() {
                self.index = code.len();
                break;
            }

            let rule = self.top_rule();
            let Some(found) = rule.matcher.exec(code, self.index, &mut self.regex_index)? else {
                break;
            };

            let before = &code[self.index..found.start];
            let processed = self.process_lexeme(before, Some(found))?;
            self.index = found.start + processed;
        }

        let rest = &code[self.index..];
        self.process_lexeme(rest, None)?;
        Ok(())
    }

    fn finish(self) -> HighlightResult {
        let tree = self.tree.finish();
        let value = HtmlRenderer::render(&tree, &self.highlighter.options().class_prefix);
        trace!(
            "`{}`: {} bytes, {} iterations, relevance {}",
            self.language,
            self.code.len(),
            self.iterations,
            self.relevance
        );
        HighlightResult {
            language: Some(self.language.to_owned()),
            relevance: self.relevance,
            value,
            illegal: false,
            illegal_by: None,
            error_raised: None,
            tree,
            top: Some(Continuation {
                grammar: self.grammar.clone(),
                frames: self.frames,
            }),
            second_best: None,
        }
    }

    /// Consumes the text before a match and the match itself, returns how far
    /// past the start of the match the scan should continue.
    fn process_lexeme(
        &mut self,
        before: &str,
        found: Option<RegexMatch<MatchType>>,
    ) -> Result<usize, HighlightError> {
        self.buffer.push_str(before);

        let Some(found) = found else {
            self.process_buffer()?;
            return Ok(0);
        };
        let code = self.code;
        let lexeme = found.lexeme(code);

        if self.iterations > MAX_ITERATIONS && self.iterations > found.start * 3 {
            return Err(HighlightError::InfiniteLoop {
                language: self.language.to_owned(),
                iterations: self.iterations,
            });
        }

        // an empty match right where the previous begin matched would open or
        // close rules forever without consuming input
        let previous = self.last_match.replace((found.payload, found.start));
        let stalled = lexeme.is_empty()
            && matches!(previous, Some((MatchType::Begin(_), at)) if at == found.start);
        if stalled && found.payload == MatchType::End {
            return self.step_over(found.start);
        }

        match found.payload {
            MatchType::Begin(rule) => return self.do_begin(found, rule, stalled),
            MatchType::Illegal if !self.ignore_illegals => {
                return Err(HighlightError::Illegal {
                    language: self.language.to_owned(),
                    lexeme: lexeme.to_owned(),
                    mode: self.top_rule().scope_or_unnamed().to_owned(),
                    offset: found.start,
                    context: context_around(code, found.start),
                });
            }
            MatchType::End => {
                if let Some(processed) = self.do_end(found)? {
                    return Ok(processed);
                }
            }
            MatchType::Illegal => {}
        }

        if found.payload == MatchType::Illegal && lexeme.is_empty() {
            return Ok(self.take_char(found.start));
        }

        self.buffer.push_str(lexeme);
        Ok(lexeme.len())
    }

    /// Moves the character at `offset` into the buffer, returns its length.
    /// At the end of input this steps past it so the scan terminates.
    fn take_char(&mut self, offset: usize) -> usize {
        let next = next_char_boundary(self.code, offset);
        match self.code.get(offset..next) {
            Some(c) => {
                self.buffer.push_str(c);
                next - offset
            }
            None => 1,
        }
    }

    fn step_over(&mut self, offset: usize) -> Result<usize, HighlightError> {
        if !self.safe_mode {
            return Err(HighlightError::ZeroWidthMatch {
                language: self.language.to_owned(),
                offset,
            });
        }
        Ok(self.take_char(offset))
    }

    fn do_ignore(&mut self, offset: usize) -> usize {
        match self.regex_index {
            // every alternative was tried here, move on by a character
            0 => self.take_char(offset),
            _ => {
                self.resume = true;
                0
            }
        }
    }

    fn begin_ignored(&self, rule: &Rule, found: &RegexMatch<MatchType>) -> bool {
        match rule.begin_guard {
            Some(BeginGuard::NotAroundDot) => {
                self.code[..found.start].ends_with('.') || self.code[found.end..].starts_with('.')
            }
            Some(BeginGuard::InputStart) => found.start != 0,
            None => false,
        }
    }

    fn do_begin(
        &mut self,
        found: RegexMatch<MatchType>,
        id: RuleId,
        stalled: bool,
    ) -> Result<usize, HighlightError> {
        let grammar: &'a Grammar = self.grammar;
        let rule = grammar.rule(id);
        let lexeme = found.lexeme(self.code);

        if self.begin_ignored(rule, &found) {
            return Ok(self.do_ignore(found.start));
        }
        if stalled {
            return self.step_over(found.start);
        }

        let end_override = match rule.end_same_as_begin {
            true => Some(anchored_regex(&regex::escape(lexeme), false)?),
            false => None,
        };
        let begin_capture = match rule.end_guard {
            Some(EndGuard::SameCaptureAsBegin) => found.first_group(self.code).map(str::to_owned),
            None => None,
        };

        if rule.flags.skip {
            self.buffer.push_str(lexeme);
        } else {
            if rule.flags.exclude_begin {
                self.buffer.push_str(lexeme);
            }
            self.process_buffer()?;
            if !rule.flags.return_begin && !rule.flags.exclude_begin {
                self.buffer.push_str(lexeme);
            }
        }

        self.start_rule(Frame {
            rule: id,
            end_override,
            begin_capture,
        })?;

        match rule.flags.return_begin {
            true => Ok(0),
            false => Ok(lexeme.len()),
        }
    }

    fn start_rule(&mut self, frame: Frame) -> Result<(), HighlightError> {
        if self.frames.len() >= MAX_NESTING {
            return Err(HighlightError::NestingTooDeep {
                language: self.language.to_owned(),
                limit: MAX_NESTING,
            });
        }
        if let Some(scope) = &self.grammar.rule(frame.rule).scope {
            self.tree.open_node(scope);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Index of the frame the end match closes, if any.
    fn end_of_mode(&self, depth: usize, found: &RegexMatch<MatchType>) -> Option<usize> {
        let frame = &self.frames[depth];
        let rule = self.grammar.rule(frame.rule);

        let end = frame.end_override.as_ref().or(rule.end_re.as_ref());
        let mut matched = end.is_some_and(|re| re.is_match(&self.code[found.start..]));
        if matched && rule.end_guard == Some(EndGuard::SameCaptureAsBegin) {
            matched = found.first_group(self.code) == frame.begin_capture.as_deref();
        }

        if matched {
            let mut depth = depth;
            while depth > 1 && self.grammar.rule(self.frames[depth].rule).flags.ends_parent {
                depth -= 1;
            }
            return Some(depth);
        }

        if rule.ends_with_parent && depth > 0 {
            return self.end_of_mode(depth - 1, found);
        }
        None
    }

    fn do_end(&mut self, found: RegexMatch<MatchType>) -> Result<Option<usize>, HighlightError> {
        let grammar: &'a Grammar = self.grammar;
        let lexeme = found.lexeme(self.code);
        let Some(end_depth) = self.end_of_mode(self.frames.len() - 1, &found) else {
            return Ok(None);
        };
        // the root has no end
        let end_depth = end_depth.max(1);

        let origin = self.top_rule();
        if origin.flags.skip {
            self.buffer.push_str(lexeme);
        } else {
            if !(origin.flags.return_end || origin.flags.exclude_end) {
                self.buffer.push_str(lexeme);
            }
            self.process_buffer()?;
            if origin.flags.exclude_end {
                self.buffer.push_str(lexeme);
            }
        }

        let mut ended = None;
        while self.frames.len() > end_depth {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            let rule = grammar.rule(frame.rule);
            if rule.scope.is_some() {
                self.tree.close_node();
            }
            if !rule.flags.skip && rule.sub_language.is_none() {
                self.relevance += rule.relevance;
            }
            ended = Some(frame);
        }

        if let Some(frame) = ended {
            let rule = grammar.rule(frame.rule);
            if let Some(starts) = rule.starts {
                self.start_rule(Frame {
                    rule: starts,
                    end_override: frame.end_override.filter(|_| rule.end_same_as_begin),
                    begin_capture: frame.begin_capture,
                })?;
            }
        }

        match origin.flags.return_end {
            true => Ok(Some(0)),
            false => Ok(Some(lexeme.len())),
        }
    }

    fn process_buffer(&mut self) -> Result<(), HighlightError> {
        let rule = self.top_rule();
        match &rule.sub_language {
            Some(sub) => self.process_sub_language(rule, sub)?,
            None => self.process_keywords(rule),
        }
        self.buffer.clear();
        Ok(())
    }

    fn process_keywords(&mut self, rule: &Rule) {
        let (Some(keywords), Some(pattern)) = (&rule.keywords, &rule.keyword_pattern) else {
            self.tree.add_text(&self.buffer);
            return;
        };

        let case_insensitive = self.grammar.case_insensitive;
        let mut last = 0;
        for word in pattern.find_iter(&self.buffer) {
            let found = match case_insensitive {
                true => keywords.get(&word.as_str().to_lowercase()),
                false => keywords.get(word.as_str()),
            };
            if let Some(keyword) = found {
                self.tree.add_text(&self.buffer[last..word.start()]);
                self.relevance += keyword.relevance;
                self.tree.add_keyword(word.as_str(), &keyword.scope);
                last = word.end();
            }
        }
        self.tree.add_text(&self.buffer[last..]);
    }

    fn process_sub_language(
        &mut self,
        rule: &Rule,
        sub: &SubLanguage,
    ) -> Result<(), HighlightError> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        if self.depth >= MAX_SUBLANGUAGE_DEPTH {
            self.tree.add_text(&self.buffer);
            return Ok(());
        }

        let result = match sub {
            SubLanguage::Single(name) => {
                let Some(grammar) = self.highlighter.get_language(name) else {
                    self.tree.add_text(&self.buffer);
                    return Ok(());
                };
                let result = highlight_grammar(
                    self.highlighter,
                    ScanRequest {
                        language: name,
                        grammar: &grammar,
                        code: &self.buffer,
                        ignore_illegals: true,
                        continuation: self.continuations.get(name),
                        depth: self.depth + 1,
                    },
                )?;
                match &result.top {
                    Some(top) => self.continuations.insert(name.clone(), top.clone()),
                    None => self.continuations.remove(name),
                };
                result
            }
            SubLanguage::Auto(candidates) => {
                let subset = match candidates.is_empty() {
                    true => None,
                    false => Some(candidates.as_slice()),
                };
                self.highlighter.auto_detect(&self.buffer, subset, self.depth + 1)
            }
        };

        if rule.relevance > 0 {
            self.relevance += result.relevance;
        }
        self.tree.add_sublanguage(result.tree, result.language.as_deref());
        Ok(())
    }
}
