//! Command definitions.
//!
//! A command is an XML document `{prompts_dir}/{name}.xml` declaring the
//! arguments it accepts, the variables derived from them, the prompt
//! template, and the files handed to the assistant as context:
//!
//! ```xml
//! <command>
//!   <argument id="CLASS" alias="class" question="Which class?"/>
//!   <variable id="CLASSFILE" argument="CLASS" converter="resolveClassPath"/>
//!   <prompt>Write a unit test for CLASS in CLASSFILE.</prompt>
//!   <context>
//!     <include path="$CLASSFILE"/>
//!     <include path="tests"/>
//!   </context>
//! </command>
//! ```

mod loader;
mod model;


pub use model::{ArgumentDecl, CommandSpec, ContextInclude, VariableDecl};
