use thicket_dom::Tag;

use crate::error::TreeErrorKind;
use crate::parser::core::{Handled, InsertionMode, TreeConstructor};
use crate::tokenizer::Token;

impl TreeConstructor {
    /// Swap the current template insertion mode for `mode` and switch to it.
    fn retarget_template(&mut self, mode: InsertionMode) -> Handled {
        // "Pop the current template insertion mode off the stack of template
        // insertion modes. Push `mode` onto the stack of template insertion
        // modes so that it is the new current template insertion mode. Switch
        // the insertion mode to `mode`, and reprocess the token."
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.insertion_mode = mode;
        Ok(false)
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(in crate::parser) fn handle_in_template_mode(&mut self, token: &mut Token) -> Handled {
        match &*token {
            Token::Character(_) | Token::Comment(_) | Token::Doctype(_) => {
                self.process_using_mode(InsertionMode::InBody, token)
            }

            Token::StartTag(tag) => match tag.name.tag() {
                Tag::Base
                | Tag::Basefont
                | Tag::Bgsound
                | Tag::Link
                | Tag::Meta
                | Tag::Noframes
                | Tag::Script
                | Tag::Style
                | Tag::Template
                | Tag::Title => self.process_using_mode(InsertionMode::InHead, token),
                Tag::Caption | Tag::Colgroup | Tag::Tbody | Tag::Tfoot | Tag::Thead => {
                    self.retarget_template(InsertionMode::InTable)
                }
                Tag::Col => self.retarget_template(InsertionMode::InColumnGroup),
                Tag::Tr => self.retarget_template(InsertionMode::InTableBody),
                Tag::Td | Tag::Th => self.retarget_template(InsertionMode::InRow),
                // "Any other start tag"
                _ => self.retarget_template(InsertionMode::InBody),
            },

            Token::EndTag(tag) if tag.name == Tag::Template => {
                self.process_using_mode(InsertionMode::InHead, token)
            }
            // "Any other end tag: Parse error. Ignore the token."
            Token::EndTag(_) => {
                self.parse_error(TreeErrorKind::UnexpectedEndTag, token);
                Ok(true)
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open elements,
                // then stop parsing. (fragment case)"
                if !self.template_on_stack() {
                    self.stop_parsing();
                    return Ok(true);
                }
                // "Otherwise, this is a parse error. Pop elements from the stack
                // of open elements until a template element has been popped from
                // the stack. Clear the list of active formatting elements up to
                // the last marker. Pop the current template insertion mode off
                // the stack of template insertion modes. Reset the insertion mode
                // appropriately. Reprocess the token."
                self.parse_error(TreeErrorKind::UnexpectedEof, token);
                self.pop_until(Tag::Template);
                self.clear_active_formatting_elements_to_last_marker();
                let _ = self.template_insertion_modes.pop();
                self.reset_insertion_mode_appropriately();
                Ok(false)
            }
        }
    }
}
